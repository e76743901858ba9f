//! # SML Error Handling
//!
//! This module defines the SmlError enum, which represents the different error
//! types that can occur in the sml-rs crate.

use thiserror::Error;

/// Represents the different error types that can occur while decoding SML data.
///
/// Framer-level failures (buffer overflow, outer trailer CRC mismatch) are
/// self-healing and only surface through the reader statistics; the variants
/// here are the per-call failures of the packet parser.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SmlError {
    /// The packet does not start with the escape and version-1 markers.
    #[error("Invalid packet header: begin/version markers not found")]
    InvalidPacketHeader,

    /// The CRC of an SML message inside the packet does not match.
    #[error("Message CRC mismatch: expected {expected:04X}, calculated {calculated:04X}")]
    MessageCrcMismatch { expected: u16, calculated: u16 },

    /// All messages validated but none carried a GetListResponse body.
    #[error("No GetListResponse message in packet")]
    NoListResponse,

    /// A length field points past the end of the packet.
    #[error("Truncated packet: read at {pos} beyond length {len}")]
    TruncatedPacket { pos: usize, len: usize },

    /// Invalid hexadecimal input (CLI and test tooling).
    #[error("Invalid hexadecimal string: {0}")]
    InvalidHexString(String),
}
