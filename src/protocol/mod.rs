//! Protocol layer: wire format constants and the frame decoder.
//!
//! - [`wire_format`] - header bit layout, opcodes, unmasking
//! - [`decoder`] - pure `decode_frame` over an in-memory buffer

pub mod decoder;
pub mod wire_format;

pub use decoder::{decode_frame, DecodedFrame, Frame};
pub use wire_format::{bits, unmask, Opcode, MASKING_KEY_SIZE, MIN_HEADER_SIZE};
