//! # Running CRC16 (CCITT / X.25 variant)
//!
//! SML protects both the outer packet framing and every inner message with a
//! CRC16 as used by X.25/HDLC: reflected polynomial 0x8408, initial state
//! 0xFFFF, final complement, transmitted high byte first.
//!
//! The accumulator is stateful on purpose: the outer trailer CRC must resume
//! from a state checkpointed earlier in the same packet, so the type exposes
//! an opaque [`CrcState`] snapshot that can re-seed another (or the same)
//! instance at that point.

/// Reflected CCITT polynomial
const CRC_POLY: u16 = 0x8408;

/// Initial shift-register state
const CRC_INIT: u16 = 0xFFFF;

/// Opaque snapshot of a [`Crc16Ccitt`] mid-stream state.
///
/// Only usable to re-seed an accumulator at the same point; the raw register
/// value is deliberately not exposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrcState(u16);

impl CrcState {
    /// State of an accumulator that has consumed the eight begin/version
    /// marker bytes (`1B 1B 1B 1B 01 01 01 01`) from the initial state.
    /// Used to re-seed the stream CRC when a packet start is recognized
    /// after the marker bytes have already passed by.
    pub const AFTER_BEGIN_MARKERS: CrcState = CrcState(0x91DC);
}

/// Stateful running CRC16 accumulator.
#[derive(Debug, Clone)]
pub struct Crc16Ccitt {
    state: u16,
}

impl Crc16Ccitt {
    /// Create an accumulator in the initial state.
    pub fn new() -> Self {
        Self { state: CRC_INIT }
    }

    /// Reset to the initial state.
    pub fn init(&mut self) {
        self.state = CRC_INIT;
    }

    /// Re-seed from a previously taken snapshot.
    pub fn reseed(&mut self, snapshot: CrcState) {
        self.state = snapshot.0;
    }

    /// Snapshot the current mid-stream state.
    pub fn snapshot(&self) -> CrcState {
        CrcState(self.state)
    }

    /// Fold one byte into the checksum.
    pub fn update(&mut self, byte: u8) {
        let mut crc = self.state ^ u16::from(byte);
        for _ in 0..8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ CRC_POLY;
            } else {
                crc >>= 1;
            }
        }
        self.state = crc;
    }

    /// Fold a byte slice into the checksum.
    pub fn update_slice(&mut self, data: &[u8]) {
        for &byte in data {
            self.update(byte);
        }
    }

    /// Finalized checksum: complemented and byte-swapped so the u16 compares
    /// directly against the big-endian value transmitted on the wire.
    pub fn value(&self) -> u16 {
        let crc = !self.state;
        crc.rotate_left(8)
    }
}

impl Default for Crc16Ccitt {
    fn default() -> Self {
        Self::new()
    }
}
