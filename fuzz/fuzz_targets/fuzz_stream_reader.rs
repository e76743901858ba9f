#![no_main]

use libfuzzer_sys::fuzz_target;
use sml_rs::{FeedOutcome, SmlStreamReader};

fuzz_target!(|data: &[u8]| {
    // Arbitrary line noise must never panic or loop; any yielded packet
    // must carry the marker prefix the parser expects.
    let mut reader = SmlStreamReader::new(512);
    let mut rest = data;
    while let FeedOutcome::PacketReady { consumed } = reader.feed(rest) {
        assert!(consumed > 0 && consumed <= rest.len());
        let packet = reader.packet();
        assert!(packet.len() >= 8);
        assert_eq!(&packet[..4], &[0x1B; 4]);
        rest = &rest[consumed..];
    }

    // Feeding the same input one byte at a time must also hold up.
    let mut reader = SmlStreamReader::new(512);
    for &byte in data {
        let _ = reader.feed(&[byte]);
    }
});
