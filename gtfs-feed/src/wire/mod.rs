//! Protocol Buffer binary wire format.
//!
//! This module knows nothing about GTFS-realtime. It splits a buffer into
//! (field number, wire type, value) events and can write the same encoding
//! back out. Key characteristics:
//! - Integers are base-128 varints; `int32` negatives take ten bytes
//! - Fixed-width values are little-endian
//! - Length-delimited values are opaque until a schema interprets them
//! - Every read is bounds-checked; truncation is an error, never a panic

mod error;
mod reader;
mod writer;

pub use error::{DecodeError, DecodeErrorKind};
pub use reader::{DEFAULT_MAX_DEPTH, Field, FieldValue, WireReader, WireType};
pub use writer::{MessageWriter, encode_tag, encode_varint};
