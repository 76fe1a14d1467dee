//! Wire format constants and field extraction.
//!
//! Implements the frame header layout:
//! ```text
//! ┌─────┬─────────┬────────┬──────┬─────────┬──────────────┬─────────────┐
//! │ FIN │ RSV1-3  │ Opcode │ MASK │ Len (7) │ Ext len 0/2  │ Mask key 0/4│
//! │ 1bit│ 3 bits  │ 4 bits │ 1bit │ bits    │ bytes, u16 BE│ bytes       │
//! └─────┴─────────┴────────┴──────┴─────────┴──────────────┴─────────────┘
//! ```
//!
//! All multi-byte integers are Big Endian. A 7-bit length of 126 means the
//! real length follows as a 16-bit value; 127 means a 64-bit value follows,
//! which this implementation does not support.

/// Minimum frame size: one flag/opcode byte plus one mask/length byte.
pub const MIN_HEADER_SIZE: usize = 2;

/// Masking key size in bytes (fixed, exactly 4).
pub const MASKING_KEY_SIZE: usize = 4;

/// 7-bit length marker: real length follows as u16 BE.
pub const LENGTH_MARKER_U16: u8 = 126;

/// 7-bit length marker: real length follows as u64 BE (unsupported).
pub const LENGTH_MARKER_U64: u8 = 127;

/// Bit masks and shifts for the header bytes.
pub mod bits {
    /// FIN flag: bit 7 of byte 0.
    pub const FIN: u8 = 0b1000_0000;
    /// RSV1: bit 6 of byte 0.
    pub const RSV1: u8 = 0b0100_0000;
    /// RSV2: bit 5 of byte 0.
    pub const RSV2: u8 = 0b0010_0000;
    /// RSV3: bit 4 of byte 0.
    pub const RSV3: u8 = 0b0001_0000;
    /// Opcode: low nibble of byte 0.
    pub const OPCODE: u8 = 0b0000_1111;
    /// MASK flag: bit 7 of byte 1.
    pub const MASK: u8 = 0b1000_0000;
    /// 7-bit payload length: low 7 bits of byte 1.
    pub const LENGTH: u8 = 0b0111_1111;

    /// Check if a specific flag bit is set.
    #[inline]
    pub fn has_bit(byte: u8, bit: u8) -> bool {
        byte & bit != 0
    }
}

/// 4-bit frame opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    /// Continuation of a fragmented message (0x0).
    Continuation,
    /// Text frame (0x1).
    Text,
    /// Binary frame (0x2).
    Binary,
    /// Connection close (0x8).
    Close,
    /// Ping (0x9).
    Ping,
    /// Pong (0xA).
    Pong,
    /// Reserved opcode (0x3-0x7, 0xB-0xF).
    Reserved(u8),
}

impl Opcode {
    /// Decode an opcode from the low nibble of the first header byte.
    ///
    /// Total over the 4-bit space; unknown values map to `Reserved`.
    pub fn from_bits(value: u8) -> Self {
        match value & bits::OPCODE {
            0x0 => Opcode::Continuation,
            0x1 => Opcode::Text,
            0x2 => Opcode::Binary,
            0x8 => Opcode::Close,
            0x9 => Opcode::Ping,
            0xA => Opcode::Pong,
            other => Opcode::Reserved(other),
        }
    }

    /// Check if this opcode carries application text.
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self, Opcode::Text)
    }

    /// Check if this opcode terminates the connection.
    #[inline]
    pub fn is_close(&self) -> bool {
        matches!(self, Opcode::Close)
    }
}

/// Unmask payload bytes in place.
///
/// XORs each byte with the masking-key byte at `i % 4`, key in network
/// byte order (byte 0 = most-significant byte of the 32-bit key).
pub fn unmask(payload: &mut [u8], key: [u8; MASKING_KEY_SIZE]) {
    for (i, byte) in payload.iter_mut().enumerate() {
        *byte ^= key[i % MASKING_KEY_SIZE];
    }
}
