//! Shared test helpers: TLV element builders and a realistic three-message
//! demo telegram (OpenResponse, GetListResponse, CloseResponse) with all
//! CRCs computed on the fly.

#![allow(dead_code)]

use sml_rs::frame::Crc16Ccitt;

// ----------------------------------------------------------------------------
// TLV element builders (short-form headers, enough for test telegrams)
// ----------------------------------------------------------------------------

pub fn octet(payload: &[u8]) -> Vec<u8> {
    assert!(payload.len() < 15, "short-form octet string only");
    let mut out = vec![(payload.len() + 1) as u8];
    out.extend_from_slice(payload);
    out
}

/// Optional element that is not set.
pub fn empty() -> Vec<u8> {
    vec![0x01]
}

pub fn uint8(value: u8) -> Vec<u8> {
    vec![0x62, value]
}

pub fn uint16(value: u16) -> Vec<u8> {
    let mut out = vec![0x63];
    out.extend_from_slice(&value.to_be_bytes());
    out
}

pub fn uint32(value: u32) -> Vec<u8> {
    let mut out = vec![0x65];
    out.extend_from_slice(&value.to_be_bytes());
    out
}

pub fn int8(value: i8) -> Vec<u8> {
    vec![0x52, value as u8]
}

pub fn int16(value: i16) -> Vec<u8> {
    let mut out = vec![0x53];
    out.extend_from_slice(&value.to_be_bytes());
    out
}

pub fn int32(value: i32) -> Vec<u8> {
    let mut out = vec![0x55];
    out.extend_from_slice(&value.to_be_bytes());
    out
}

pub fn list(children: &[Vec<u8>]) -> Vec<u8> {
    assert!(children.len() < 15, "short-form list only");
    let mut out = vec![0x70 | children.len() as u8];
    for child in children {
        out.extend_from_slice(child);
    }
    out
}

/// SML_Time choice: secIndex variant.
pub fn sec_time(seconds: u32) -> Vec<u8> {
    list(&[uint8(1), uint32(seconds)])
}

// ----------------------------------------------------------------------------
// Message and telegram assembly
// ----------------------------------------------------------------------------

/// Assemble one SML message: sequence of transaction id, group number,
/// abort-on-error, body, CRC16 over everything so far, end-of-message.
pub fn message(transaction_id: &[u8], body: Vec<u8>) -> Vec<u8> {
    let mut msg = vec![0x76];
    msg.extend_from_slice(&octet(transaction_id));
    msg.extend_from_slice(&uint8(0));
    msg.extend_from_slice(&uint8(0));
    msg.extend_from_slice(&body);

    let mut crc = Crc16Ccitt::new();
    crc.update_slice(&msg);
    let value = crc.value();
    msg.push(0x63);
    msg.extend_from_slice(&value.to_be_bytes());
    msg.push(0x00);
    msg
}

/// One entry of a GetListResponse value list.
pub struct ListEntry {
    pub obis: [u8; 6],
    pub status: Vec<u8>,
    pub val_time: Vec<u8>,
    pub unit: Vec<u8>,
    pub scale: Vec<u8>,
    pub value: Vec<u8>,
}

impl ListEntry {
    pub fn build(&self) -> Vec<u8> {
        list(&[
            octet(&self.obis),
            self.status.clone(),
            self.val_time.clone(),
            self.unit.clone(),
            self.scale.clone(),
            self.value.clone(),
            empty(), // signature
        ])
    }
}

pub fn open_response(server_id: &[u8]) -> Vec<u8> {
    list(&[
        uint16(0x0101),
        list(&[
            empty(), // codepage
            empty(), // client id
            octet(&[0x15, 0x17, 0x15]),
            octet(server_id),
            empty(), // reference time
            empty(), // sml version
        ]),
    ])
}

pub fn get_list_response(server_id: &[u8], entries: &[ListEntry]) -> Vec<u8> {
    let built: Vec<Vec<u8>> = entries.iter().map(ListEntry::build).collect();
    list(&[
        uint16(0x0701),
        list(&[
            empty(), // client id
            octet(server_id),
            empty(), // list name
            sec_time(0x0153_7E14),
            list(&built),
            empty(), // list signature
            empty(), // gateway time
        ]),
    ])
}

pub fn close_response() -> Vec<u8> {
    list(&[uint16(0x0201), list(&[empty()])])
}

/// Frame a payload for the wire: begin/version markers, padding to a
/// multiple of 4, end markers, trailer with spare count and CRC16.
pub fn frame(payload: &[u8]) -> Vec<u8> {
    let mut wire = vec![0x1B, 0x1B, 0x1B, 0x1B, 0x01, 0x01, 0x01, 0x01];
    wire.extend_from_slice(payload);
    let spare = (4 - payload.len() % 4) % 4;
    wire.extend(std::iter::repeat(0x00).take(spare));
    wire.extend_from_slice(&[0x1B, 0x1B, 0x1B, 0x1B]);

    let mut crc = Crc16Ccitt::new();
    crc.update_slice(&wire);
    crc.update(0x1A);
    crc.update(spare as u8);
    let value = crc.value();

    wire.push(0x1A);
    wire.push(spare as u8);
    wire.extend_from_slice(&value.to_be_bytes());
    wire
}

/// The packet a stream reader yields for `payload`: marker prefix plus the
/// payload with padding stripped.
pub fn packet_from(payload: &[u8]) -> Vec<u8> {
    let mut packet = vec![0x1B, 0x1B, 0x1B, 0x1B, 0x01, 0x01, 0x01, 0x01];
    packet.extend_from_slice(payload);
    packet
}

// ----------------------------------------------------------------------------
// Demo telegram
// ----------------------------------------------------------------------------

pub const DEMO_SERVER_ID: [u8; 6] = [0x01, 0x45, 0x4D, 0x48, 0x06, 0x63];

/// Sum active power raw value (centi-W at scale -2): 185.54 W.
pub const DEMO_POWER_RAW: i16 = 18554;

/// Consumed energy raw value (deci-Wh at scale -1): 252133.20 Wh.
pub const DEMO_ENERGY_RAW: i32 = 2_521_332;

pub fn demo_entries(power_raw: i16) -> Vec<ListEntry> {
    vec![
        // Serial number row: octet value, no unit/scale, tariff group 9.
        ListEntry {
            obis: [1, 0, 0, 0, 9, 255],
            status: empty(),
            val_time: empty(),
            unit: empty(),
            scale: empty(),
            value: octet(&DEMO_SERVER_ID),
        },
        // Consumed energy, tariff 0: 1-0:1.8.0.
        ListEntry {
            obis: [1, 0, 1, 8, 0, 255],
            status: uint32(0x0001_0182),
            val_time: empty(),
            unit: uint8(0x1E), // Wh
            scale: int8(-1),
            value: int32(DEMO_ENERGY_RAW),
        },
        // Consumed energy, tariff 1: skipped by the parser.
        ListEntry {
            obis: [1, 0, 1, 8, 1, 255],
            status: empty(),
            val_time: empty(),
            unit: uint8(0x1E),
            scale: int8(-1),
            value: int32(999_999),
        },
        // Signed sum of active power: 1-0:16.7.0.
        ListEntry {
            obis: [1, 0, 16, 7, 0, 255],
            status: empty(),
            val_time: empty(),
            unit: uint8(0x1B), // W
            scale: int8(-2),
            value: int16(power_raw),
        },
    ]
}

/// Payload of the demo telegram: OpenResponse, GetListResponse, CloseResponse.
pub fn demo_payload_with_power(power_raw: i16) -> Vec<u8> {
    let mut payload = Vec::new();
    payload.extend_from_slice(&message(
        &[0x00, 0x15, 0x61, 0x63],
        open_response(&DEMO_SERVER_ID),
    ));
    payload.extend_from_slice(&message(
        &[0x00, 0x15, 0x61, 0x64],
        get_list_response(&DEMO_SERVER_ID, &demo_entries(power_raw)),
    ));
    payload.extend_from_slice(&message(&[0x00, 0x15, 0x61, 0x65], close_response()));
    payload
}

/// Demo telegram as it appears on the wire.
pub fn demo_wire() -> Vec<u8> {
    frame(&demo_payload_with_power(DEMO_POWER_RAW))
}

/// Demo telegram as a framed packet (stream reader output / parser input).
pub fn demo_packet() -> Vec<u8> {
    packet_from(&demo_payload_with_power(DEMO_POWER_RAW))
}

/// Expected readings after parsing the demo telegram once.
pub const DEMO_POWER_IN_CW: u32 = 18554;
pub const DEMO_ENERGY_IN_CWH: u64 = 25_213_320;
