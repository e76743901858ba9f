//! # TLV Structure Printer
//!
//! Renders the nested TLV tree of a framed SML packet as an indented,
//! annotated hex listing. Debugging aid for unknown meters: run the framer
//! on a captured stream and dump every packet to see which OBIS entries the
//! meter actually sends.

use crate::constants::*;
use crate::payload::parser::TlvCursor;

/// Column where annotations start, matching three-space indent steps.
const ANNOTATION_COLUMN: usize = 50;

/// Render the TLV tree of a framed packet (begin/version markers plus
/// messages) into a multi-line string.
///
/// Malformed input renders as far as the structure allows and stops at the
/// buffer end; this never fails or panics.
pub fn render_packet(packet: &[u8]) -> String {
    let mut out = String::new();
    if packet.len() < 8 {
        out.push_str("(packet too short for begin/version markers)\n");
        return out;
    }

    let mut cursor = TlvCursor::at(packet, 8);
    // Remaining-children counters, one per open list.
    let mut open_lists: Vec<u16> = Vec::new();

    while !cursor.at_end() {
        let start = cursor.pos();
        let depth = open_lists.len();
        let Ok(element_type) = cursor.element_type() else {
            break;
        };
        let Ok(length) = cursor.peek_length() else {
            break;
        };

        match element_type {
            SML_LIST_ID => {
                push_line(&mut out, packet, start, 1, depth, &format!("list of {length}"));
                cursor.advance(1);
                if length == 0 {
                    close_element(&mut open_lists);
                } else {
                    open_lists.push(length);
                }
                continue;
            }
            SML_OCTET_ID if length == 0 => {
                push_line(&mut out, packet, start, 1, depth, "endOfMessage");
                cursor.advance(1);
                open_lists.clear();
                continue;
            }
            SML_OCTET_ID if length == 1 => {
                push_line(&mut out, packet, start, 1, depth, "optional, not used");
                cursor.advance(1);
            }
            SML_OCTET_ID => {
                // The header may span several bytes (length continuation);
                // the printable payload starts after all of them.
                let mut header = cursor.clone();
                let _ = header.read_length();
                let end = (start + usize::from(length)).min(packet.len());
                let payload_start = header.pos().min(end);
                let text: String = packet[payload_start..end]
                    .iter()
                    .map(|&b| {
                        if (b' '..=b'Z').contains(&b) {
                            b as char
                        } else {
                            '.'
                        }
                    })
                    .collect();
                let count = end - start;
                push_line(&mut out, packet, start, count, depth, &format!("string = {text}"));
                cursor.advance(usize::from(length));
            }
            SML_BOOL_ID => {
                let value = packet.get(start + 1).copied().unwrap_or(0);
                let count = usize::from(length).min(packet.len() - start);
                push_line(&mut out, packet, start, count, depth, &format!("bool = {value}"));
                cursor.advance(usize::from(length).max(1));
            }
            _ => {
                // signed or unsigned integer
                let mut value_cursor = TlvCursor::at(packet, start);
                let value = value_cursor.read_int().unwrap_or(0);
                let label = if element_type == SML_INT_ID {
                    format!("int = {value}")
                } else {
                    format!("uint = {value}")
                };
                let count = usize::from(length).min(packet.len() - start);
                push_line(&mut out, packet, start, count, depth, &label);
                cursor.advance(usize::from(length).max(1));
            }
        }
        close_element(&mut open_lists);
    }
    out
}

/// One leaf element finished: decrement the innermost list, popping lists
/// that are complete.
fn close_element(open_lists: &mut Vec<u16>) {
    while let Some(top) = open_lists.last_mut() {
        *top -= 1;
        if *top == 0 {
            open_lists.pop();
        } else {
            break;
        }
    }
}

fn push_line(out: &mut String, packet: &[u8], start: usize, count: usize, depth: usize, label: &str) {
    let indent = 3 * depth;
    for _ in 0..indent {
        out.push(' ');
    }
    let end = (start + count).min(packet.len());
    let mut column = indent;
    for &byte in &packet[start..end] {
        out.push_str(&format!("{byte:02x} "));
        column += 3;
    }
    while column < ANNOTATION_COLUMN {
        out.push(' ');
        column += 1;
    }
    out.push_str(label);
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_small_tree() {
        // Framed packet containing: list of 2 [ uint 7, octet "AB" ], end marker.
        let mut packet = vec![0x1B, 0x1B, 0x1B, 0x1B, 0x01, 0x01, 0x01, 0x01];
        packet.extend_from_slice(&[0x72, 0x62, 0x07, 0x03, 0x41, 0x42, 0x00]);
        let rendered = render_packet(&packet);
        assert!(rendered.contains("list of 2"));
        assert!(rendered.contains("uint = 7"));
        assert!(rendered.contains("string = AB"));
        assert!(rendered.contains("endOfMessage"));
    }

    #[test]
    fn test_render_long_octet_string() {
        // Octet string long enough for a two-byte length header: the header
        // bytes must not leak into the rendered text.
        let payload = b"ABCDEFGHIJKLMNOP";
        let mut packet = vec![0x1B, 0x1B, 0x1B, 0x1B, 0x01, 0x01, 0x01, 0x01];
        packet.extend_from_slice(&[0x81, 0x02]); // octet, length 0x12
        packet.extend_from_slice(payload);
        packet.push(0x00);

        let rendered = render_packet(&packet);
        assert!(rendered.contains("string = ABCDEFGHIJKLMNOP"));
    }

    #[test]
    fn test_render_never_panics_on_garbage() {
        let garbage: Vec<u8> = (0..64).map(|i| (i * 37) as u8).collect();
        let _ = render_packet(&garbage);
        let _ = render_packet(&[]);
    }

    #[test]
    fn test_render_short_packet() {
        let rendered = render_packet(&[0x1B, 0x1B]);
        assert!(rendered.contains("too short"));
    }
}
