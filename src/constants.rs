//! SML Protocol Constants
//!
//! This module defines constants used in the SML (Smart Message Language)
//! implementation, based on BSI TR-03109-1 (wired LMN interface, part b).

/// Escape/marker byte; four in a row introduce an escape sequence
pub const SML_ESCAPE: u8 = 0x1B;

/// Version byte; four in a row after an escape sequence start a v1 packet
pub const SML_VERSION1: u8 = 0x01;

/// Escape word for the version-1 begin marker (`01 01 01 01`)
pub const SML_BEGIN_VERSION1: u32 = 0x0101_0101;

/// Escape word for an escaped literal `1B 1B 1B 1B` payload sequence
pub const SML_ESC_LITERAL: u32 = 0x1B1B_1B1B;

/// End-of-packet marker byte, first byte of the trailer escape word
pub const SML_END: u8 = 0x1A;

/// Mask selecting the end-marker byte inside an escape word
pub const SML_END_MASK: u32 = 0xFF00_0000;

/// Mask selecting the spare-byte count inside a trailer escape word
pub const SML_SPARE_MASK: u32 = 0x00FF_0000;

/// Mask selecting the expected CRC16 inside a trailer escape word
pub const SML_CRC_MASK: u32 = 0x0000_FFFF;

// ----------------------------------------------------------------------------
// TLV element header
// ----------------------------------------------------------------------------

/// Continuation flag: another header byte follows with 4 more length bits
pub const SML_MORE_FLAG: u8 = 0x80;

/// Mask for the type tag bits of an element header
pub const SML_TAG_MASK: u8 = 0x70;

/// Mask for the length nibble of an element header
pub const SML_LENGTH_MASK: u8 = 0x0F;

/// Type tag: octet string
pub const SML_OCTET_ID: u8 = 0x00;

/// Type tag: boolean
pub const SML_BOOL_ID: u8 = 0x40;

/// Type tag: signed integer
pub const SML_INT_ID: u8 = 0x50;

/// Type tag: unsigned integer
pub const SML_UINT_ID: u8 = 0x60;

/// Type tag: list
pub const SML_LIST_ID: u8 = 0x70;

/// End-of-message byte terminating each SML message
pub const SML_END_OF_MESSAGE: u8 = 0x00;

// ----------------------------------------------------------------------------
// Message ids
// ----------------------------------------------------------------------------

/// OpenResponse message id
pub const SML_OPEN_RES: u16 = 0x0101;

/// CloseResponse message id
pub const SML_CLOSE_RES: u16 = 0x0201;

/// GetListResponse message id; the only body this crate interprets
pub const SML_GET_LIST_RES: u16 = 0x0701;

// ----------------------------------------------------------------------------
// OBIS constants
//
// For details see:
// https://www.promotic.eu/en/pmdoc/Subsystems/Comm/PmDrivers/IEC62056_OBIS.htm
// ----------------------------------------------------------------------------

/// OBIS type (value group D): instantaneous power
pub const OBIS_INSTANTANEOUS_POWER_TYPE: u8 = 7;

/// OBIS type (value group D): time-integrated energy
pub const OBIS_ENERGY_TYPE: u8 = 8;

/// OBIS index (value group C): positive active power/energy (consumption)
pub const OBIS_POSITIVE_ACTIVE_POWER: u8 = 1;

/// OBIS index (value group C): negative active power/energy (feed-in)
pub const OBIS_NEGATIVE_ACTIVE_POWER: u8 = 2;

/// OBIS index (value group C): signed sum of active power over all phases
pub const OBIS_SUM_ACTIVE_POWER: u8 = 16;

// ----------------------------------------------------------------------------
// Scale factors
// ----------------------------------------------------------------------------

/// Smallest accepted decimal scale exponent
pub const SML_MIN_SCALE: i8 = -2;

/// Largest accepted decimal scale exponent
pub const SML_MAX_SCALE: i8 = 5;

/// Multipliers indexed by `scale - SML_MIN_SCALE`, pre-shifted by 100 so a
/// scaled value is already in centi-units (centi-W / centi-Wh).
pub const SML_SCALE_FACTORS: [i64; 8] = [
    1, 10, 100, 1_000, 10_000, 100_000, 1_000_000, 10_000_000,
];
