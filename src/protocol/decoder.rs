//! Pure frame decoder: byte buffer in, decoded message or control signal out.
//!
//! No state, no I/O. The decoder classifies the frame by opcode first:
//! close frames and non-text frames short-circuit after reading only the
//! first byte, so malformed length or mask fields on frames we do not care
//! about never surface as errors. Only text frames go through full header
//! resolution, unmasking and UTF-8 decoding.
//!
//! # Example
//!
//! ```
//! use sockgate::protocol::{decode_frame, DecodedFrame};
//!
//! // Unmasked text frame: FIN + text opcode, length 5, "Hello"
//! let buf = [0x81, 0x05, b'H', b'e', b'l', b'l', b'o'];
//! match decode_frame(&buf).unwrap() {
//!     DecodedFrame::Text(text) => assert_eq!(text, "Hello"),
//!     other => panic!("unexpected: {:?}", other),
//! }
//! ```

use bytes::Bytes;

use super::wire_format::{
    bits, unmask, Opcode, LENGTH_MARKER_U16, LENGTH_MARKER_U64, MASKING_KEY_SIZE, MIN_HEADER_SIZE,
};
use crate::error::{Result, SockgateError};

/// A fully parsed text frame.
///
/// Transient: produced and consumed within a single decode call, never
/// stored. The payload is already unmasked.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Final fragment marker (bit 7 of byte 0).
    pub fin: bool,
    /// Protocol-extension bits RSV1-3; must be zero.
    pub reserved: (bool, bool, bool),
    /// Frame opcode (always `Text` for a parsed frame).
    pub opcode: Opcode,
    /// Whether the payload arrived masked.
    pub masked: bool,
    /// Effective payload length after extended-length resolution.
    pub payload_length: usize,
    /// Masking key, present iff `masked`. Network byte order.
    pub masking_key: Option<[u8; MASKING_KEY_SIZE]>,
    /// Unmasked payload bytes.
    pub payload: Bytes,
}

/// Result of decoding one frame buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedFrame {
    /// Connection-termination frame (opcode 0x8). No payload interpretation.
    Close,
    /// Frame whose opcode is not text; caller takes no action.
    Ignored,
    /// Text frame with its unmasked UTF-8 payload.
    Text(String),
}

/// Decode a single frame from a byte buffer.
///
/// # Errors
///
/// - [`SockgateError::MalformedFrame`] if the buffer is shorter than the
///   header claims, or a reserved bit is set on a text frame.
/// - [`SockgateError::UnsupportedFrame`] if the frame uses 64-bit extended
///   payload length (7-bit length field of 127).
/// - [`SockgateError::Utf8`] if the payload is not valid UTF-8.
pub fn decode_frame(buf: &[u8]) -> Result<DecodedFrame> {
    let first = *buf
        .first()
        .ok_or_else(|| SockgateError::MalformedFrame("empty buffer".to_string()))?;

    let opcode = Opcode::from_bits(first);

    // Close and non-text frames are classified from byte 0 alone.
    if opcode.is_close() {
        return Ok(DecodedFrame::Close);
    }
    if !opcode.is_text() {
        tracing::debug!(opcode = ?opcode, "ignoring non-text frame");
        return Ok(DecodedFrame::Ignored);
    }

    let frame = parse_text_frame(buf, first)?;
    let text = std::str::from_utf8(&frame.payload)?.to_owned();
    Ok(DecodedFrame::Text(text))
}

/// Parse a text frame's header and payload.
///
/// `first` is byte 0, already read by `decode_frame`.
fn parse_text_frame(buf: &[u8], first: u8) -> Result<Frame> {
    let fin = bits::has_bit(first, bits::FIN);
    let reserved = (
        bits::has_bit(first, bits::RSV1),
        bits::has_bit(first, bits::RSV2),
        bits::has_bit(first, bits::RSV3),
    );

    // No extensions are negotiated, so reserved bits must be zero.
    if reserved.0 || reserved.1 || reserved.2 {
        return Err(SockgateError::MalformedFrame(
            "reserved bits must be zero".to_string(),
        ));
    }

    let second = *buf
        .get(1)
        .ok_or_else(|| SockgateError::MalformedFrame("missing length byte".to_string()))?;
    let masked = bits::has_bit(second, bits::MASK);

    let mut cursor = MIN_HEADER_SIZE;

    let payload_length = match second & bits::LENGTH {
        LENGTH_MARKER_U64 => return Err(SockgateError::UnsupportedFrame),
        LENGTH_MARKER_U16 => {
            let end = cursor + 2;
            let raw = buf.get(cursor..end).ok_or_else(|| {
                SockgateError::MalformedFrame("truncated extended length".to_string())
            })?;
            cursor = end;
            u16::from_be_bytes([raw[0], raw[1]]) as usize
        }
        literal => literal as usize,
    };

    let masking_key = if masked {
        let end = cursor + MASKING_KEY_SIZE;
        let raw = buf.get(cursor..end).ok_or_else(|| {
            SockgateError::MalformedFrame("truncated masking key".to_string())
        })?;
        cursor = end;
        Some([raw[0], raw[1], raw[2], raw[3]])
    } else {
        None
    };

    let end = cursor + payload_length;
    let raw = buf.get(cursor..end).ok_or_else(|| {
        SockgateError::MalformedFrame(format!(
            "payload truncated: header claims {} bytes, {} available",
            payload_length,
            buf.len() - cursor
        ))
    })?;

    let mut data = raw.to_vec();
    if let Some(key) = masking_key {
        unmask(&mut data, key);
    }

    Ok(Frame {
        fin,
        reserved,
        opcode: Opcode::Text,
        masked,
        payload_length,
        masking_key,
        payload: Bytes::from(data),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build an unmasked text frame for a payload.
    fn text_frame(payload: &[u8]) -> Vec<u8> {
        assert!(payload.len() <= 125);
        let mut buf = vec![0x81, payload.len() as u8];
        buf.extend_from_slice(payload);
        buf
    }

    /// Build a masked text frame for a payload and key.
    fn masked_text_frame(payload: &[u8], key: [u8; 4]) -> Vec<u8> {
        assert!(payload.len() <= 125);
        let mut buf = vec![0x81, 0x80 | payload.len() as u8];
        buf.extend_from_slice(&key);
        for (i, &b) in payload.iter().enumerate() {
            buf.push(b ^ key[i % 4]);
        }
        buf
    }

    #[test]
    fn test_unmasked_hello() {
        let buf = [0x81, 0x05, b'H', b'e', b'l', b'l', b'o'];
        assert_eq!(
            decode_frame(&buf).unwrap(),
            DecodedFrame::Text("Hello".to_string())
        );
    }

    #[test]
    fn test_masked_hello() {
        let key = [0x37, 0xFA, 0x21, 0x3D];
        let buf = masked_text_frame(b"Hello", key);
        assert_eq!(
            decode_frame(&buf).unwrap(),
            DecodedFrame::Text("Hello".to_string())
        );
    }

    #[test]
    fn test_masking_inverts_at_every_offset() {
        // Payload lengths 1..=9 cover every byte offset mod 4.
        let key = [0xA1, 0x00, 0xFF, 0x5C];
        let payload = "abcdefghi";
        for len in 1..=payload.len() {
            let slice = &payload.as_bytes()[..len];
            let masked = decode_frame(&masked_text_frame(slice, key)).unwrap();
            let unmasked = decode_frame(&text_frame(slice)).unwrap();
            assert_eq!(masked, unmasked);
        }
    }

    #[test]
    fn test_close_frame() {
        let buf = [0x88, 0x00];
        assert_eq!(decode_frame(&buf).unwrap(), DecodedFrame::Close);
    }

    #[test]
    fn test_close_ignores_remaining_buffer() {
        // Garbage after byte 0 must not be read.
        let buf = [0x88, 0xFF, 0xFF, 0xFF];
        assert_eq!(decode_frame(&buf).unwrap(), DecodedFrame::Close);
        // Even a lone close byte decodes.
        assert_eq!(decode_frame(&[0x88]).unwrap(), DecodedFrame::Close);
    }

    #[test]
    fn test_non_text_opcodes_ignored() {
        // Binary, ping, pong, continuation, reserved.
        for first in [0x82u8, 0x89, 0x8A, 0x80, 0x83, 0x8F] {
            // Single byte only: Ignored must not read further.
            assert_eq!(decode_frame(&[first]).unwrap(), DecodedFrame::Ignored);
        }
    }

    #[test]
    fn test_extended_16bit_length() {
        let payload = "x".repeat(300);
        let mut buf = vec![0x81, LENGTH_MARKER_U16, 0x01, 0x2C]; // 300 BE
        buf.extend_from_slice(payload.as_bytes());
        assert_eq!(
            decode_frame(&buf).unwrap(),
            DecodedFrame::Text(payload)
        );
    }

    #[test]
    fn test_extended_16bit_length_masked() {
        let key = [0x11, 0x22, 0x33, 0x44];
        let payload: Vec<u8> = b"y".repeat(200);
        let mut buf = vec![0x81, 0x80 | LENGTH_MARKER_U16, 0x00, 0xC8]; // 200 BE
        buf.extend_from_slice(&key);
        for (i, &b) in payload.iter().enumerate() {
            buf.push(b ^ key[i % 4]);
        }
        assert_eq!(
            decode_frame(&buf).unwrap(),
            DecodedFrame::Text("y".repeat(200))
        );
    }

    #[test]
    fn test_64bit_length_unsupported() {
        let buf = [0x81, LENGTH_MARKER_U64, 0, 0, 0, 0, 0, 0, 0, 1];
        assert!(matches!(
            decode_frame(&buf),
            Err(SockgateError::UnsupportedFrame)
        ));
    }

    #[test]
    fn test_truncated_single_byte_text() {
        // Only byte 0 present with text opcode: malformed, no OOB read.
        let result = decode_frame(&[0x81]);
        assert!(matches!(result, Err(SockgateError::MalformedFrame(_))));
    }

    #[test]
    fn test_empty_buffer() {
        assert!(matches!(
            decode_frame(&[]),
            Err(SockgateError::MalformedFrame(_))
        ));
    }

    #[test]
    fn test_truncated_payload() {
        // Header claims 5 bytes, only 3 present.
        let buf = [0x81, 0x05, b'H', b'e', b'l'];
        let err = decode_frame(&buf).unwrap_err();
        assert!(err.to_string().contains("payload truncated"));
    }

    #[test]
    fn test_truncated_extended_length() {
        let buf = [0x81, LENGTH_MARKER_U16, 0x01];
        assert!(matches!(
            decode_frame(&buf),
            Err(SockgateError::MalformedFrame(_))
        ));
    }

    #[test]
    fn test_truncated_masking_key() {
        let buf = [0x81, 0x85, 0xAA, 0xBB];
        assert!(matches!(
            decode_frame(&buf),
            Err(SockgateError::MalformedFrame(_))
        ));
    }

    #[test]
    fn test_reserved_bits_rejected_on_text() {
        // RSV1 set on a text frame.
        let buf = [0xC1, 0x01, b'a'];
        let err = decode_frame(&buf).unwrap_err();
        assert!(err.to_string().contains("reserved bits"));
    }

    #[test]
    fn test_reserved_bits_do_not_block_close() {
        // Opcode classification wins over reserved-bit validation.
        let buf = [0xC8, 0x00];
        assert_eq!(decode_frame(&buf).unwrap(), DecodedFrame::Close);
    }

    #[test]
    fn test_empty_text_frame() {
        let buf = [0x81, 0x00];
        assert_eq!(
            decode_frame(&buf).unwrap(),
            DecodedFrame::Text(String::new())
        );
    }

    #[test]
    fn test_invalid_utf8_payload() {
        let buf = [0x81, 0x02, 0xFF, 0xFE];
        assert!(matches!(decode_frame(&buf), Err(SockgateError::Utf8(_))));
    }

    #[test]
    fn test_utf8_multibyte_roundtrip() {
        let payload = "héllo ☃";
        let buf = text_frame(payload.as_bytes());
        assert_eq!(
            decode_frame(&buf).unwrap(),
            DecodedFrame::Text(payload.to_string())
        );
    }

    #[test]
    fn test_parse_text_frame_fields() {
        let key = [1, 2, 3, 4];
        let buf = masked_text_frame(b"abc", key);
        let frame = parse_text_frame(&buf, buf[0]).unwrap();
        assert!(frame.fin);
        assert_eq!(frame.reserved, (false, false, false));
        assert!(frame.masked);
        assert_eq!(frame.payload_length, 3);
        assert_eq!(frame.masking_key, Some(key));
        assert_eq!(&frame.payload[..], b"abc");
    }

    #[test]
    fn test_trailing_bytes_after_payload_are_ignored() {
        let mut buf = text_frame(b"hi").to_vec();
        buf.extend_from_slice(b"junk");
        assert_eq!(
            decode_frame(&buf).unwrap(),
            DecodedFrame::Text("hi".to_string())
        );
    }
}
