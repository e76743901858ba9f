//! # Hex Encoding/Decoding Utilities
//!
//! Thin helpers over the `hex` crate used for telegram dumps, log output,
//! and test data.

use crate::error::SmlError;

/// Encode bytes to a lowercase hex string.
pub fn encode_hex(data: &[u8]) -> String {
    hex::encode(data)
}

/// Decode a hex string to bytes; whitespace is stripped first.
pub fn decode_hex(hex_str: &str) -> Result<Vec<u8>, SmlError> {
    let cleaned: String = hex_str.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return Err(SmlError::InvalidHexString("empty input".into()));
    }
    hex::decode(&cleaned).map_err(|e| SmlError::InvalidHexString(e.to_string()))
}

/// Parse a hex string that may contain separators; strips every non-hex
/// character. Used for CLI input where dumps come with spaces, colons, or
/// line breaks.
pub fn parse_hex_lenient(input: &str) -> Result<Vec<u8>, SmlError> {
    let hex_chars: String = input.chars().filter(|c| c.is_ascii_hexdigit()).collect();
    if hex_chars.is_empty() {
        return Err(SmlError::InvalidHexString("no hex digits in input".into()));
    }
    hex::decode(&hex_chars).map_err(|e| SmlError::InvalidHexString(e.to_string()))
}

/// Format bytes as "1b 1b 1b 1b" for compact log lines.
pub fn format_hex_compact(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Test helper: decode hex or panic.
pub fn hex_to_bytes(hex_str: &str) -> Vec<u8> {
    decode_hex(hex_str).expect("invalid hex in test data")
}
