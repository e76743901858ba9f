//! Unit tests for the running CRC16 accumulator (CCITT / X.25 variant).

use sml_rs::frame::{Crc16Ccitt, CrcState};

#[test]
fn test_known_check_value() {
    // X.25 check value of "123456789" is 0x906E; value() reports it
    // byte-swapped to compare against the big-endian wire order.
    let mut crc = Crc16Ccitt::new();
    crc.update_slice(b"123456789");
    assert_eq!(crc.value(), 0x6E90);
}

#[test]
fn test_state_after_begin_markers() {
    let mut crc = Crc16Ccitt::new();
    crc.update_slice(&[0x1B, 0x1B, 0x1B, 0x1B, 0x01, 0x01, 0x01, 0x01]);
    assert_eq!(crc.snapshot(), CrcState::AFTER_BEGIN_MARKERS);
}

#[test]
fn test_trailer_of_minimal_packet() {
    // Packet whose payload is a single escaped literal run; the trailer CRC
    // covers begin through the spare-count byte.
    let mut crc = Crc16Ccitt::new();
    crc.update_slice(&[0x1B; 4]);
    crc.update_slice(&[0x01; 4]);
    crc.update_slice(&[0x1B; 8]);
    crc.update_slice(&[0x1B; 4]);
    crc.update(0x1A);
    crc.update(0x00);
    assert_eq!(crc.value(), 0x94FC);
}

#[test]
fn test_checkpoint_resumes_mid_stream() {
    let mut reference = Crc16Ccitt::new();
    reference.update_slice(b"payload bytes");
    reference.update_slice(b"trailer bytes");

    let mut crc = Crc16Ccitt::new();
    crc.update_slice(b"payload bytes");
    let checkpoint = crc.snapshot();
    crc.update_slice(b"unrelated detour");

    crc.reseed(checkpoint);
    crc.update_slice(b"trailer bytes");
    assert_eq!(crc.value(), reference.value());
}

#[test]
fn test_distinct_inputs_distinct_checksums() {
    let mut a = Crc16Ccitt::new();
    a.update_slice(&[0x76, 0x05, 0x00]);
    let mut b = Crc16Ccitt::new();
    b.update_slice(&[0x76, 0x05, 0x01]);
    assert_ne!(a.value(), b.value());
}
