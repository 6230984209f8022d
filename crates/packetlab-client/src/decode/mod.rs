//! Typed models for the server's capture-analysis responses.
//!
//! Everything here is an immutable value type built once from a server
//! response and never sent back. Absent optional keys stay `None`; unknown
//! keys are ignored for forward compatibility. The `Decode` → `Packet` →
//! `Proto` → `Field` chain is self-referential, so it is decoded by the
//! depth-guarded routines in `parser` instead of a serde derive; the flat
//! summary and dump models use serde directly.

mod model;
mod parser;

pub use model::{
    Ascii, AsciiByte, AsciiFrame, AsciiLine, Decode, Field, Packet, Proto, Section, Structure,
    Summary, SummaryPacket,
};
pub use parser::{DecodeError, MAX_FIELD_DEPTH, decode_document, decode_from_value};
