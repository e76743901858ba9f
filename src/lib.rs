//! # sml-rs - A Rust Crate for SML (Smart Message Language) Meter Telemetry
//!
//! The sml-rs crate decodes the serial telemetry protocol of utility smart
//! meters ("SML", BSI TR-03109-1) into numeric readings: instantaneous active
//! power and cumulative energy, for consumption and feed-in.
//!
//! ## Features
//!
//! - Extract checksummed packets from a continuous, escaped byte stream with
//!   automatic resynchronization across noise, partial reads, and checksum
//!   failures
//! - Validate outer (framing) and inner (per-message) CRC16 checksums
//! - Walk the nested TLV structure of a packet and extract OBIS-tagged
//!   power and energy values at tariff 0
//! - Keep all physical quantities as integers in centi-units (centi-W,
//!   centi-Wh), no floating point
//! - Render the TLV tree of a packet for protocol debugging
//! - Support for logging and error handling
//!
//! ## Usage
//!
//! ```rust
//! use sml_rs::{FeedOutcome, SmlParser, SmlStreamReader};
//!
//! let mut reader = SmlStreamReader::new(1024);
//! let mut parser = SmlParser::new();
//!
//! let mut chunk: &[u8] = &[]; // bytes from the serial line
//! while let FeedOutcome::PacketReady { consumed } = reader.feed(chunk) {
//!     if parser.parse_packet(reader.packet()).is_ok() {
//!         println!("power: {} cW", parser.power_in_cw());
//!     }
//!     chunk = &chunk[consumed..];
//! }
//! ```
//!
//! Everything is synchronous and allocation-free per call: one fixed-size
//! buffer per reader instance, sized at construction. Instances are fully
//! independent, one per physical meter.

pub mod constants;
pub mod error;
pub mod frame;
pub mod logging;
pub mod payload;
pub mod util;

pub use crate::error::SmlError;
pub use crate::logging::{init_logger, log_info};

// Core SML types
pub use frame::{Crc16Ccitt, CrcState, FeedOutcome, ReaderStats, SmlStreamReader};
pub use payload::{render_packet, MeterReadings, SmlParser, TlvCursor};
