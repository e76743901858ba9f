//! # SML Packet Parsing
//!
//! Walks the nested TLV structure of a validated SML packet, checks the
//! per-message CRC16, and extracts the OBIS-tagged power and energy readings
//! from GetListResponse messages.
//!
//! Every TLV element starts with a header byte
//! `[continuation:1][type:3][lengthNibble:4]`; while the continuation flag is
//! set, the next byte contributes four more length bits. The resulting length
//! includes the header byte(s) themselves. List elements declare a child
//! count instead of a byte length, their children follow directly in the
//! stream.
//!
//! All values are kept as integers in centi-units (centi-W / centi-Wh); the
//! scale table is pre-shifted by 100 so no floating point is involved.

use crate::constants::*;
use crate::error::SmlError;
use crate::frame::crc::Crc16Ccitt;

/// Position cursor over a packet buffer.
///
/// Reads are validated against the buffer length; a length field pointing
/// past the end surfaces as [`SmlError::TruncatedPacket`] instead of a wild
/// read, since the transport is untrusted.
#[derive(Debug, Clone)]
pub struct TlvCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> TlvCursor<'a> {
    /// Cursor at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Cursor at a given offset inside `data`.
    pub fn at(data: &'a [u8], pos: usize) -> Self {
        Self { data, pos }
    }

    /// Current offset.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// True once the cursor has reached the end of the buffer.
    pub fn at_end(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Move the cursor forward without interpreting the bytes.
    pub fn advance(&mut self, count: usize) {
        self.pos += count;
    }

    fn byte(&self, at: usize) -> Result<u8, SmlError> {
        self.data.get(at).copied().ok_or(SmlError::TruncatedPacket {
            pos: at,
            len: self.data.len(),
        })
    }

    /// The byte under the cursor.
    pub fn peek_byte(&self) -> Result<u8, SmlError> {
        self.byte(self.pos)
    }

    /// Consume and return the byte under the cursor.
    pub fn take_byte(&mut self) -> Result<u8, SmlError> {
        let byte = self.byte(self.pos)?;
        self.pos += 1;
        Ok(byte)
    }

    /// Type tag of the element under the cursor.
    pub fn element_type(&self) -> Result<u8, SmlError> {
        Ok(self.byte(self.pos)? & SML_TAG_MASK)
    }

    /// Decode the length of the element at `at`, following continuation
    /// header bytes. Returns the length and the offset just past the header.
    fn length_at(&self, at: usize) -> Result<(u16, usize), SmlError> {
        let mut p = at;
        let mut length = u16::from(self.byte(p)? & SML_LENGTH_MASK);
        while self.byte(p)? & SML_MORE_FLAG != 0 && p < self.data.len() {
            p += 1;
            length = (length << 4) | u16::from(self.byte(p)? & SML_LENGTH_MASK);
        }
        Ok((length, p + 1))
    }

    /// Length of the element under the cursor, without moving it.
    ///
    /// Used when deciding how many sibling elements remain to skip.
    pub fn peek_length(&self) -> Result<u16, SmlError> {
        Ok(self.length_at(self.pos)?.0)
    }

    /// Length of the element under the cursor, consuming its header byte(s).
    ///
    /// For a list this enters the element: the children follow directly.
    pub fn read_length(&mut self) -> Result<u16, SmlError> {
        let (length, next) = self.length_at(self.pos)?;
        self.pos = next;
        Ok(length)
    }

    /// Skip exactly `count` sibling elements at the current level.
    ///
    /// Skipped lists are flattened instead of recursed into: a list's
    /// declared child count is added to the remaining skip budget, which is
    /// equivalent to a depth-first traversal because the children are the
    /// next bytes in the stream. Returns the offset after the last skipped
    /// element.
    pub fn skip_elements(&mut self, count: u32) -> Result<usize, SmlError> {
        let mut remaining = count;
        while remaining > 0 && self.pos < self.data.len() {
            remaining -= 1;
            let element_type = self.element_type()?;
            let (element_length, past_header) = self.length_at(self.pos)?;
            if element_type == SML_LIST_ID {
                // List lengths count children, not bytes; flatten them into
                // the remaining skip budget.
                self.pos = past_header;
                remaining += u32::from(element_length);
            } else {
                self.pos += usize::from(element_length);
            }
        }
        Ok(self.pos)
    }

    /// Decode the integer element under the cursor.
    ///
    /// Signed and unsigned elements with at least one payload byte are
    /// folded big-endian into an `i64`; the first payload byte is
    /// sign-extended only for the signed tag. Any other tag (octet strings,
    /// booleans, empty optionals) is skipped opaquely and decodes as 0.
    ///
    /// The unsigned path shares the signed accumulator, so an 8-byte
    /// unsigned value with the top bit set comes back negative; callers that
    /// care truncate to the width they expect.
    pub fn read_int(&mut self) -> Result<i64, SmlError> {
        let start = self.pos;
        let element_type = self.element_type()?;
        let element_length = self.read_length()?;
        if (element_type == SML_INT_ID || element_type == SML_UINT_ID) && element_length > 1 {
            let first = self.take_byte()?;
            let mut value = if element_type == SML_INT_ID {
                i64::from(first as i8)
            } else {
                i64::from(first)
            };
            for _ in 2..element_length {
                // wrapping: an 8-byte unsigned value may carry into the sign
                // bit of the shared i64 accumulator
                value = value.wrapping_shl(8) | i64::from(self.take_byte()?);
            }
            Ok(value)
        } else {
            self.pos = start + usize::from(element_length).max(1);
            Ok(0)
        }
    }
}

/// Snapshot of the parser accumulator.
///
/// The four value fields are last-writer-wins per successful parse; a failed
/// parse leaves them untouched. When readings are polled from a different
/// execution context than the one feeding bytes, take this struct as a whole
/// instead of reading individual getters, since the group is not updated
/// atomically.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MeterReadings {
    /// Consumed active power in centi-W
    pub power_in_cw: u32,
    /// Delivered (fed-in) active power in centi-W
    pub power_out_cw: u32,
    /// Consumed active energy in centi-Wh
    pub energy_in_cwh: u64,
    /// Delivered active energy in centi-Wh
    pub energy_out_cwh: u64,
    /// Successful parse calls
    pub parsed_ok: u32,
    /// Failed parse calls
    pub parse_errors: u32,
}

#[derive(Debug, Default, Clone, Copy)]
struct ReadingFields {
    power_in_cw: u32,
    power_out_cw: u32,
    energy_in_cwh: u64,
    energy_out_cwh: u64,
}

/// Parser extracting power and energy values from framed SML packets.
///
/// One instance accumulates readings across packets of one meter; multiple
/// meters get independent instances.
#[derive(Debug, Default)]
pub struct SmlParser {
    fields: ReadingFields,
    parsed_ok: u32,
    parse_errors: u32,
}

impl SmlParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumed active power in centi-W.
    pub fn power_in_cw(&self) -> u32 {
        self.fields.power_in_cw
    }

    /// Delivered active power in centi-W.
    pub fn power_out_cw(&self) -> u32 {
        self.fields.power_out_cw
    }

    /// Consumed active energy in centi-Wh.
    pub fn energy_in_cwh(&self) -> u64 {
        self.fields.energy_in_cwh
    }

    /// Delivered active energy in centi-Wh.
    pub fn energy_out_cwh(&self) -> u64 {
        self.fields.energy_out_cwh
    }

    /// Number of successful parse calls.
    pub fn parsed_ok(&self) -> u32 {
        self.parsed_ok
    }

    /// Number of failed parse calls.
    pub fn parse_errors(&self) -> u32 {
        self.parse_errors
    }

    /// Full accumulator snapshot.
    pub fn readings(&self) -> MeterReadings {
        MeterReadings {
            power_in_cw: self.fields.power_in_cw,
            power_out_cw: self.fields.power_out_cw,
            energy_in_cwh: self.fields.energy_in_cwh,
            energy_out_cwh: self.fields.energy_out_cwh,
            parsed_ok: self.parsed_ok,
            parse_errors: self.parse_errors,
        }
    }

    /// Parse one framed SML packet (begin/version markers plus messages, as
    /// yielded by [`SmlStreamReader`](crate::frame::SmlStreamReader)).
    ///
    /// The call succeeds only if every message CRC validates and at least one
    /// GetListResponse body was decoded. Field updates are staged and
    /// committed as a group on success, so a failed call never leaves the
    /// accumulator partially updated. Fields whose tariff or scale fall
    /// outside the accepted range are skipped without failing the call.
    pub fn parse_packet(&mut self, packet: &[u8]) -> Result<(), SmlError> {
        match self.walk_packet(packet) {
            Ok(fields) => {
                self.fields = fields;
                self.parsed_ok += 1;
                Ok(())
            }
            Err(e) => {
                self.parse_errors += 1;
                Err(e)
            }
        }
    }

    fn walk_packet(&self, packet: &[u8]) -> Result<ReadingFields, SmlError> {
        if !has_frame_header(packet) {
            return Err(SmlError::InvalidPacketHeader);
        }

        let mut fields = self.fields;
        let mut cursor = TlvCursor::at(packet, 8);
        let mut found_list_response = false;

        while !cursor.at_end() {
            if cursor.peek_byte()? == SML_END_OF_MESSAGE {
                break;
            }
            let message_start = cursor.pos();
            cursor.read_length()?; // enter the message sequence
            let body_pos = cursor.skip_elements(3)?; // transaction id, group no, abort flag
            cursor.skip_elements(1)?; // message body, lands on the crc field
            let message_end = cursor.pos();
            let expected = cursor.read_int()? as u16;

            let mut crc = Crc16Ccitt::new();
            crc.update_slice(&packet[message_start..message_end]);
            let calculated = crc.value();
            if expected != calculated {
                return Err(SmlError::MessageCrcMismatch {
                    expected,
                    calculated,
                });
            }

            if parse_message_body(packet, body_pos, &mut fields)? {
                found_list_response = true;
            }
            cursor.advance(1); // end-of-message byte
        }

        if found_list_response {
            Ok(fields)
        } else {
            Err(SmlError::NoListResponse)
        }
    }
}

fn has_frame_header(packet: &[u8]) -> bool {
    packet.len() >= 8
        && packet[..4].iter().all(|&b| b == SML_ESCAPE)
        && packet[4..8].iter().all(|&b| b == SML_VERSION1)
}

/// Decode one message body; returns true if it was a GetListResponse.
fn parse_message_body(
    packet: &[u8],
    body_pos: usize,
    fields: &mut ReadingFields,
) -> Result<bool, SmlError> {
    let mut cursor = TlvCursor::at(packet, body_pos);
    cursor.read_length()?; // enter the body choice sequence
    let message_id = cursor.read_int()? as u16;
    if message_id != SML_GET_LIST_RES {
        return Ok(false);
    }

    cursor.read_length()?; // enter the GetListResponse sequence
    cursor.skip_elements(4)?; // client id, server id, list name, sensor time
    let entries = cursor.read_length()?; // value list child count
    for _ in 0..entries {
        cursor.read_length()?; // enter the list entry sequence
        cursor.advance(3); // object name header, OBIS media and channel
        let index = cursor.take_byte()?;
        let obis_type = cursor.take_byte()?;
        let tariff = cursor.take_byte()?;
        cursor.advance(1); // OBIS value group F
        cursor.skip_elements(2)?; // status, timestamp
        cursor.read_int()?; // unit
        let scale = cursor.read_int()? as i8;
        let raw = cursor.read_int()?;
        cursor.skip_elements(1)?; // signature

        if tariff == 0 && (SML_MIN_SCALE..=SML_MAX_SCALE).contains(&scale) {
            let factor = SML_SCALE_FACTORS[(scale - SML_MIN_SCALE) as usize];
            let value = raw.wrapping_mul(factor);
            apply_reading(fields, obis_type, index, value);
        }
    }
    Ok(true)
}

fn apply_reading(fields: &mut ReadingFields, obis_type: u8, index: u8, value: i64) {
    match obis_type {
        OBIS_INSTANTANEOUS_POWER_TYPE => match index {
            OBIS_POSITIVE_ACTIVE_POWER => fields.power_in_cw = value as u32,
            OBIS_NEGATIVE_ACTIVE_POWER => fields.power_out_cw = value as u32,
            OBIS_SUM_ACTIVE_POWER => {
                fields.power_in_cw = if value >= 0 { value as u32 } else { 0 };
                fields.power_out_cw = if value <= 0 { value.wrapping_neg() as u32 } else { 0 };
            }
            _ => {}
        },
        OBIS_ENERGY_TYPE => match index {
            OBIS_POSITIVE_ACTIVE_POWER => fields.energy_in_cwh = value as u64,
            OBIS_NEGATIVE_ACTIVE_POWER => fields.energy_out_cwh = value as u64,
            _ => {}
        },
        _ => {}
    }
}
