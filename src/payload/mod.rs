//! SML payload interpretation: TLV cursor, packet parser, structure printer.

pub mod parser;
pub mod printer;

pub use parser::{MeterReadings, SmlParser, TlvCursor};
pub use printer::render_packet;
