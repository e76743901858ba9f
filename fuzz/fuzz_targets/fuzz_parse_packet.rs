#![no_main]

use libfuzzer_sys::fuzz_target;
use sml_rs::{render_packet, SmlParser};

fuzz_target!(|data: &[u8]| {
    // The parser must reject arbitrary garbage without panicking.
    let mut parser = SmlParser::new();
    let _ = parser.parse_packet(data);

    // Same input with a valid marker prefix glued on, so the TLV walker
    // itself gets exercised instead of failing at the header check.
    let mut packet = vec![0x1B, 0x1B, 0x1B, 0x1B, 0x01, 0x01, 0x01, 0x01];
    packet.extend_from_slice(data);
    let _ = parser.parse_packet(&packet);

    // The printer shares the walker and must be just as robust.
    let _ = render_packet(&packet);
});
