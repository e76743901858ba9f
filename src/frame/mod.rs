//! SML packet framing: CRC16 primitive and the stream reader state machine.

pub mod crc;
pub mod stream;

pub use crc::{Crc16Ccitt, CrcState};
pub use stream::{FeedOutcome, ReaderStats, SmlStreamReader};
