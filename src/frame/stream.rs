//! # SML v1 Stream Framing
//!
//! Extracts checksummed packets from a continuous, escaped SML byte stream.
//!
//! Wire layout (BSI TR-03109-1, chapter 8.1):
//!
//! ```text
//! begin:    1B 1B 1B 1B        escape sequence
//! version:  01 01 01 01        version-1 identifier
//! payload:  xx xx ..           TLV messages, padded to a multiple of 4
//! end:      1B 1B 1B 1B        escape sequence
//! trailer:  1A ss ch cl        ss = spare (padding) bytes, chcl = CRC16
//! ```
//!
//! A literal `1B 1B 1B 1B` inside the payload is transmitted twice (byte
//! stuffing); the reader can only tell markers from stuffed literals once the
//! four bytes following an escape run have been seen, so it works strictly
//! one byte at a time. The trailer CRC covers everything from the first begin
//! byte through the spare-count byte, which requires checkpointing the
//! running CRC when the closing escape run is recognized.

use crate::constants::*;
use crate::frame::crc::{Crc16Ccitt, CrcState};
use crate::util::logging::LogThrottle;

/// Result of feeding bytes to the reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedOutcome {
    /// No complete packet yet; all input was consumed.
    Pending,
    /// A validated packet is ready; `consumed` bytes of the input were used.
    /// The caller must resume feeding from that offset, since a packet
    /// boundary may fall in the middle of an input chunk.
    PacketReady { consumed: usize },
}

/// Statistics kept by a stream reader instance.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReaderStats {
    /// Packets that passed the trailer CRC
    pub packets_ready: u64,
    /// Packets discarded because the trailer CRC did not match
    pub crc_errors: u64,
    /// Packet restarts due to buffer capacity exhaustion
    pub overflows: u64,
}

impl ReaderStats {
    /// Combined error counter (overflow + trailer CRC mismatch).
    pub fn parse_errors(&self) -> u64 {
        self.crc_errors + self.overflows
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReaderState {
    ReadingData,
    ReadingEscape,
}

/// Incremental packet extractor for an SML version-1 data stream.
///
/// Owns a single fixed-capacity packet buffer sized at construction and
/// reused for every packet. When a packet is ready, the buffer holds the
/// eight begin/version marker bytes followed by the unescaped payload with
/// the spare padding stripped, which is exactly the form
/// [`SmlParser`](crate::payload::SmlParser) consumes.
#[derive(Debug)]
pub struct SmlStreamReader {
    state: ReaderState,
    started: bool,
    buf: Box<[u8]>,
    pos: usize,
    packet_len: usize,
    esc_word: u32,
    esc_run: u8,
    crc: Crc16Ccitt,
    crc_checkpoint: CrcState,
    stats: ReaderStats,
    throttle: LogThrottle,
}

/// Begin/version prefix written at the start of every packet buffer.
const PACKET_PREFIX: [u8; 8] = [0x1B, 0x1B, 0x1B, 0x1B, 0x01, 0x01, 0x01, 0x01];

/// Smallest buffer that can hold the prefix plus one escape word.
const MIN_CAPACITY: usize = PACKET_PREFIX.len() + 4;

impl SmlStreamReader {
    /// Create a reader with the given packet buffer capacity in bytes.
    ///
    /// The capacity bounds the largest telegram the reader can hold,
    /// including the 8-byte marker prefix; longer packets are dropped via
    /// the overflow path. Capacities below a small floor are rounded up.
    pub fn new(max_packet_size: usize) -> Self {
        Self {
            state: ReaderState::ReadingData,
            started: false,
            buf: vec![0u8; max_packet_size.max(MIN_CAPACITY)].into_boxed_slice(),
            pos: 0,
            packet_len: 0,
            esc_word: 0,
            esc_run: 0,
            crc: Crc16Ccitt::new(),
            crc_checkpoint: CrcState::AFTER_BEGIN_MARKERS,
            stats: ReaderStats::default(),
            throttle: LogThrottle::new(1000, 5),
        }
    }

    /// Feed a chunk of stream bytes to the reader.
    ///
    /// Returns [`FeedOutcome::PacketReady`] as soon as a packet validates,
    /// leaving the rest of the chunk unconsumed; call again with the
    /// remainder (`&data[consumed..]`) to continue. Partial packets are kept
    /// across calls, the input slice is never buffered.
    pub fn feed(&mut self, data: &[u8]) -> FeedOutcome {
        for (i, &byte) in data.iter().enumerate() {
            self.crc.update(byte);
            let ready = match self.state {
                ReaderState::ReadingData => self.read_data(byte),
                ReaderState::ReadingEscape => self.read_escape(byte),
            };
            if ready {
                return FeedOutcome::PacketReady { consumed: i + 1 };
            }
        }
        FeedOutcome::Pending
    }

    /// The last completed packet: marker prefix plus unescaped payload.
    ///
    /// Only meaningful directly after [`feed`](Self::feed) returned
    /// [`FeedOutcome::PacketReady`]; the buffer is overwritten in place by
    /// subsequent input.
    pub fn packet(&self) -> &[u8] {
        &self.buf[..self.packet_len]
    }

    /// Reader statistics (packets, CRC errors, overflows).
    pub fn stats(&self) -> ReaderStats {
        self.stats
    }

    /// Begin accumulating a fresh packet.
    ///
    /// The begin/version markers are replayed into the buffer so the yielded
    /// packet carries the full framing header, and the CRC is re-seeded to
    /// the state those eight bytes produce.
    fn start_packet(&mut self) {
        self.buf[..PACKET_PREFIX.len()].copy_from_slice(&PACKET_PREFIX);
        self.pos = PACKET_PREFIX.len();
        self.esc_run = 0;
        self.crc.reseed(CrcState::AFTER_BEGIN_MARKERS);
    }

    fn read_data(&mut self, byte: u8) -> bool {
        if self.pos >= self.buf.len() {
            self.stats.overflows += 1;
            if self.throttle.allow() {
                log::warn!(
                    "SML packet exceeds buffer capacity ({} bytes), restarting",
                    self.buf.len()
                );
            }
            self.start_packet();
        }
        self.buf[self.pos] = byte;
        self.pos += 1;

        if byte == SML_ESCAPE {
            self.esc_run += 1;
            if self.esc_run == 4 {
                // The four escape bytes were provisional; classification of
                // the next word decides whether they come back.
                self.pos -= 4;
                self.esc_run = 4;
                self.crc_checkpoint = self.crc.snapshot();
                self.esc_word = 0;
                self.state = ReaderState::ReadingEscape;
            }
        } else {
            self.esc_run = 0;
        }
        false
    }

    fn read_escape(&mut self, byte: u8) -> bool {
        self.esc_word = (self.esc_word << 8) | u32::from(byte);
        self.esc_run -= 1;
        if self.esc_run > 0 {
            return false;
        }
        self.state = ReaderState::ReadingData;

        if self.esc_word == SML_BEGIN_VERSION1 {
            self.start_packet();
            self.started = true;
            return false;
        }
        if self.esc_word == SML_ESC_LITERAL {
            // Byte-stuffed literal: the rolled-back escape bytes are the
            // payload, restore them.
            self.pos += 4;
            return false;
        }
        if (self.esc_word & SML_END_MASK) == u32::from(SML_END) << 24 {
            if !self.started {
                // Trailer without a preceding begin/version marker: stay
                // unsynchronized until the next packet start.
                return false;
            }
            self.started = false;
            let spare = ((self.esc_word & SML_SPARE_MASK) >> 16) as usize;
            let expected = (self.esc_word & SML_CRC_MASK) as u16;

            self.packet_len = self.pos.saturating_sub(spare);
            self.crc.reseed(self.crc_checkpoint);
            self.crc.update(SML_END);
            self.crc.update(spare as u8);
            let calculated = self.crc.value();
            if expected != calculated {
                self.stats.crc_errors += 1;
                if self.throttle.allow() {
                    log::warn!(
                        "SML trailer CRC mismatch: expected {expected:04X}, calculated {calculated:04X}"
                    );
                }
                return false;
            }
            self.stats.packets_ready += 1;
            return true;
        }
        false
    }
}
