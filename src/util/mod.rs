//! Shared utilities: hex helpers and rate-limited logging.

pub mod hex;
pub mod logging;

pub use hex::{decode_hex, encode_hex, format_hex_compact, parse_hex_lenient};
pub use logging::LogThrottle;
