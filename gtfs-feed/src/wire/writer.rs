//! Minimal encoder for the Protocol Buffer binary format.
//!
//! Used to synthesize realtime buffers in tests and tooling. Fields are
//! written in the order the builder methods are called, which makes it
//! easy to produce unusual orderings on purpose.

use super::reader::WireType;

/// Append `value` as a base-128 varint.
pub fn encode_varint(mut value: u64, out: &mut Vec<u8>) {
    while value >= 0x80 {
        out.push((value as u8 & 0x7F) | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
}

/// Append a field tag.
pub fn encode_tag(field: u32, wire_type: WireType, out: &mut Vec<u8>) {
    encode_varint(
        (u64::from(field) << 3) | u64::from(wire_type.bits()),
        out,
    );
}

/// Builder for one encoded message body.
///
/// # Examples
///
/// ```
/// use gtfs_feed::wire::{MessageWriter, WireReader};
///
/// let buf = MessageWriter::new().varint(1, 150).string(2, "hi").finish();
/// assert_eq!(buf, [0x08, 0x96, 0x01, 0x12, 0x02, b'h', b'i']);
///
/// let mut reader = WireReader::new(&buf);
/// assert_eq!(reader.next_field().unwrap().unwrap().as_u64().unwrap(), 150);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageWriter {
    buf: Vec<u8>,
}

impl MessageWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn varint(mut self, field: u32, value: u64) -> Self {
        encode_tag(field, WireType::Varint, &mut self.buf);
        encode_varint(value, &mut self.buf);
        self
    }

    /// `int32` encoding: negative values are sign-extended to ten bytes.
    pub fn int32(self, field: u32, value: i32) -> Self {
        self.varint(field, i64::from(value) as u64)
    }

    pub fn int64(self, field: u32, value: i64) -> Self {
        self.varint(field, value as u64)
    }

    pub fn bool(self, field: u32, value: bool) -> Self {
        self.varint(field, u64::from(value))
    }

    pub fn fixed32(mut self, field: u32, value: u32) -> Self {
        encode_tag(field, WireType::Fixed32, &mut self.buf);
        self.buf.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn fixed64(mut self, field: u32, value: u64) -> Self {
        encode_tag(field, WireType::Fixed64, &mut self.buf);
        self.buf.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn float(self, field: u32, value: f32) -> Self {
        self.fixed32(field, value.to_bits())
    }

    pub fn double(self, field: u32, value: f64) -> Self {
        self.fixed64(field, value.to_bits())
    }

    pub fn bytes(mut self, field: u32, value: &[u8]) -> Self {
        encode_tag(field, WireType::LengthDelimited, &mut self.buf);
        encode_varint(value.len() as u64, &mut self.buf);
        self.buf.extend_from_slice(value);
        self
    }

    pub fn string(self, field: u32, value: &str) -> Self {
        self.bytes(field, value.as_bytes())
    }

    /// Embed another message as a length-delimited field.
    pub fn message(self, field: u32, message: MessageWriter) -> Self {
        self.bytes(field, &message.buf)
    }

    /// Splice pre-encoded bytes in verbatim.
    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn finish(self) -> Vec<u8> {
        self.buf
    }
}
