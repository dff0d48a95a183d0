//! Schema-less reader for the Protocol Buffer binary encoding.
//!
//! The reader turns a byte slice into a stream of [`Field`] events, one per
//! tag, without knowing what message it is looking at. Interpreting field
//! numbers is the caller's job; the reader only guarantees that every event
//! lies entirely within the buffer it was given.

use std::fmt;

use super::error::{DecodeError, DecodeErrorKind};

/// Largest field number the encoding allows (29 bits).
const MAX_FIELD_NUMBER: u64 = (1 << 29) - 1;

/// Longest legal varint: ten 7-bit groups cover 64 bits.
const MAX_VARINT_LEN: usize = 10;

/// Nesting depth used when the caller does not choose one.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// How a field's bytes are laid out on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireType {
    Varint,
    Fixed64,
    LengthDelimited,
    StartGroup,
    EndGroup,
    Fixed32,
}

impl WireType {
    /// Decode the low three bits of a tag.
    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0 => Some(WireType::Varint),
            1 => Some(WireType::Fixed64),
            2 => Some(WireType::LengthDelimited),
            3 => Some(WireType::StartGroup),
            4 => Some(WireType::EndGroup),
            5 => Some(WireType::Fixed32),
            _ => None,
        }
    }

    pub fn bits(&self) -> u8 {
        match self {
            WireType::Varint => 0,
            WireType::Fixed64 => 1,
            WireType::LengthDelimited => 2,
            WireType::StartGroup => 3,
            WireType::EndGroup => 4,
            WireType::Fixed32 => 5,
        }
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WireType::Varint => "varint",
            WireType::Fixed64 => "fixed64",
            WireType::LengthDelimited => "length-delimited",
            WireType::StartGroup => "start-group",
            WireType::EndGroup => "end-group",
            WireType::Fixed32 => "fixed32",
        };
        f.write_str(name)
    }
}

/// The raw value carried by one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Varint(u64),
    Fixed64(u64),
    Fixed32(u32),
    /// A nested message, string, or byte blob; the schema decides which.
    Bytes(&'a [u8]),
    /// The raw body of a (deprecated) group, already skipped over.
    Group(&'a [u8]),
}

/// One decoded field event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field<'a> {
    pub number: u32,
    pub value: FieldValue<'a>,
    /// Absolute offset of the tag.
    pub offset: usize,
    /// Absolute offset of the value (after any length prefix).
    pub value_offset: usize,
}

impl<'a> Field<'a> {
    pub fn wire_type(&self) -> WireType {
        match self.value {
            FieldValue::Varint(_) => WireType::Varint,
            FieldValue::Fixed64(_) => WireType::Fixed64,
            FieldValue::Fixed32(_) => WireType::Fixed32,
            FieldValue::Bytes(_) => WireType::LengthDelimited,
            FieldValue::Group(_) => WireType::StartGroup,
        }
    }

    fn mismatch(&self, expected: WireType) -> DecodeError {
        DecodeError::new(
            DecodeErrorKind::WireTypeMismatch {
                field: self.number,
                expected,
                found: self.wire_type(),
            },
            self.offset,
        )
    }

    pub fn as_u64(&self) -> Result<u64, DecodeError> {
        match self.value {
            FieldValue::Varint(v) => Ok(v),
            _ => Err(self.mismatch(WireType::Varint)),
        }
    }

    /// `uint32` semantics: the varint is truncated to its low 32 bits.
    pub fn as_u32(&self) -> Result<u32, DecodeError> {
        self.as_u64().map(|v| v as u32)
    }

    /// `int32` semantics: negative values arrive sign-extended to 64 bits.
    pub fn as_i32(&self) -> Result<i32, DecodeError> {
        self.as_u64().map(|v| v as i32)
    }

    pub fn as_i64(&self) -> Result<i64, DecodeError> {
        self.as_u64().map(|v| v as i64)
    }

    pub fn as_bool(&self) -> Result<bool, DecodeError> {
        self.as_u64().map(|v| v != 0)
    }

    pub fn as_f32(&self) -> Result<f32, DecodeError> {
        match self.value {
            FieldValue::Fixed32(v) => Ok(f32::from_bits(v)),
            _ => Err(self.mismatch(WireType::Fixed32)),
        }
    }

    pub fn as_f64(&self) -> Result<f64, DecodeError> {
        match self.value {
            FieldValue::Fixed64(v) => Ok(f64::from_bits(v)),
            _ => Err(self.mismatch(WireType::Fixed64)),
        }
    }

    pub fn as_bytes(&self) -> Result<&'a [u8], DecodeError> {
        match self.value {
            FieldValue::Bytes(b) => Ok(b),
            _ => Err(self.mismatch(WireType::LengthDelimited)),
        }
    }

    /// Interpret a length-delimited field as UTF-8 text.
    pub fn as_str(&self, name: &'static str) -> Result<&'a str, DecodeError> {
        let bytes = self.as_bytes()?;
        std::str::from_utf8(bytes).map_err(|_| {
            DecodeError::new(DecodeErrorKind::InvalidUtf8 { field: name }, self.value_offset)
        })
    }

    pub fn as_string(&self, name: &'static str) -> Result<String, DecodeError> {
        self.as_str(name).map(str::to_owned)
    }
}

/// A cursor over one message body.
///
/// Offsets reported in errors are absolute: a reader created with
/// [`WireReader::nested`] knows where its slice sits in the outermost buffer.
#[derive(Debug, Clone)]
pub struct WireReader<'a> {
    buf: &'a [u8],
    pos: usize,
    base: usize,
    depth: usize,
    max_depth: usize,
}

impl<'a> WireReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self::with_max_depth(buf, DEFAULT_MAX_DEPTH)
    }

    pub fn with_max_depth(buf: &'a [u8], max_depth: usize) -> Self {
        Self {
            buf,
            pos: 0,
            base: 0,
            depth: 0,
            max_depth,
        }
    }

    /// Absolute offset of the next unread byte.
    pub fn offset(&self) -> usize {
        self.base + self.pos
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Returns true once every byte has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.buf.len()
    }

    /// Read the next field, or `None` at the end of the message.
    pub fn next_field(&mut self) -> Result<Option<Field<'a>>, DecodeError> {
        if self.is_exhausted() {
            return Ok(None);
        }

        let offset = self.offset();
        let (number, wire_type) = self.read_tag()?;

        let field = match wire_type {
            WireType::Varint => {
                let value_offset = self.offset();
                let v = self.read_varint()?;
                Field {
                    number,
                    value: FieldValue::Varint(v),
                    offset,
                    value_offset,
                }
            }
            WireType::Fixed64 => {
                let value_offset = self.offset();
                let v = u64::from_le_bytes(self.read_fixed::<8>()?);
                Field {
                    number,
                    value: FieldValue::Fixed64(v),
                    offset,
                    value_offset,
                }
            }
            WireType::Fixed32 => {
                let value_offset = self.offset();
                let v = u32::from_le_bytes(self.read_fixed::<4>()?);
                Field {
                    number,
                    value: FieldValue::Fixed32(v),
                    offset,
                    value_offset,
                }
            }
            WireType::LengthDelimited => {
                let body = self.read_length_delimited()?;
                Field {
                    number,
                    value: FieldValue::Bytes(body),
                    offset,
                    value_offset: self.offset() - body.len(),
                }
            }
            WireType::StartGroup => {
                let value_offset = self.offset();
                let body = self.skip_group(number)?;
                Field {
                    number,
                    value: FieldValue::Group(body),
                    offset,
                    value_offset,
                }
            }
            WireType::EndGroup => {
                return Err(DecodeError::new(DecodeErrorKind::UnmatchedGroup, offset));
            }
        };

        Ok(Some(field))
    }

    /// Open a reader over the body of a length-delimited field.
    ///
    /// Fails if the field is not length-delimited or if descending would
    /// exceed the depth limit.
    pub fn nested(&self, field: &Field<'a>) -> Result<WireReader<'a>, DecodeError> {
        let body = field.as_bytes()?;
        let depth = self.depth + 1;
        if depth > self.max_depth {
            return Err(DecodeError::new(
                DecodeErrorKind::NestingTooDeep {
                    limit: self.max_depth,
                },
                field.offset,
            ));
        }
        Ok(WireReader {
            buf: body,
            pos: 0,
            base: field.value_offset,
            depth,
            max_depth: self.max_depth,
        })
    }

    fn truncated(&self, offset: usize) -> DecodeError {
        DecodeError::new(DecodeErrorKind::TruncatedMessage, offset)
    }

    fn read_tag(&mut self) -> Result<(u32, WireType), DecodeError> {
        let offset = self.offset();
        let tag = self.read_varint()?;

        let bits = (tag & 0x7) as u8;
        let wire_type = WireType::from_bits(bits)
            .ok_or_else(|| DecodeError::new(DecodeErrorKind::InvalidWireType(bits), offset))?;

        let number = tag >> 3;
        if number == 0 || number > MAX_FIELD_NUMBER {
            return Err(DecodeError::new(DecodeErrorKind::InvalidFieldNumber, offset));
        }

        Ok((number as u32, wire_type))
    }

    /// Base-128 little-endian varint, continuation bit 0x80.
    fn read_varint(&mut self) -> Result<u64, DecodeError> {
        let start = self.offset();
        let mut value: u64 = 0;

        for i in 0..MAX_VARINT_LEN {
            let Some(&byte) = self.buf.get(self.pos) else {
                return Err(self.truncated(start));
            };
            self.pos += 1;

            // The tenth byte may only contribute the 64th bit
            if i == MAX_VARINT_LEN - 1 && byte > 1 {
                return Err(DecodeError::new(DecodeErrorKind::VarintOverflow, start));
            }

            value |= u64::from(byte & 0x7F) << (7 * i);
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }

        Err(DecodeError::new(DecodeErrorKind::VarintOverflow, start))
    }

    fn read_fixed<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let start = self.offset();
        let end = self.pos.checked_add(N).ok_or_else(|| self.truncated(start))?;
        let bytes = self
            .buf
            .get(self.pos..end)
            .ok_or_else(|| self.truncated(start))?;

        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        self.pos = end;
        Ok(out)
    }

    fn read_length_delimited(&mut self) -> Result<&'a [u8], DecodeError> {
        let start = self.offset();
        let len = self.read_varint()?;

        let end = usize::try_from(len)
            .ok()
            .and_then(|len| self.pos.checked_add(len))
            .ok_or_else(|| self.truncated(start))?;
        let body = self
            .buf
            .get(self.pos..end)
            .ok_or_else(|| self.truncated(start))?;

        self.pos = end;
        Ok(body)
    }

    /// Consume a group up to its matching end tag, returning the raw body.
    fn skip_group(&mut self, number: u32) -> Result<&'a [u8], DecodeError> {
        let body_start = self.pos;
        let mut open: Vec<u32> = vec![number];
        self.check_group_depth(open.len())?;

        loop {
            if self.is_exhausted() {
                return Err(self.truncated(self.offset()));
            }

            let tag_offset = self.offset();
            let tag_pos = self.pos;
            let (inner, wire_type) = self.read_tag()?;

            match wire_type {
                WireType::Varint => {
                    self.read_varint()?;
                }
                WireType::Fixed64 => {
                    self.read_fixed::<8>()?;
                }
                WireType::Fixed32 => {
                    self.read_fixed::<4>()?;
                }
                WireType::LengthDelimited => {
                    self.read_length_delimited()?;
                }
                WireType::StartGroup => {
                    open.push(inner);
                    self.check_group_depth(open.len())?;
                }
                WireType::EndGroup => {
                    if open.pop() != Some(inner) {
                        return Err(DecodeError::new(
                            DecodeErrorKind::UnmatchedGroup,
                            tag_offset,
                        ));
                    }
                    if open.is_empty() {
                        return Ok(&self.buf[body_start..tag_pos]);
                    }
                }
            }
        }
    }

    fn check_group_depth(&self, open_groups: usize) -> Result<(), DecodeError> {
        if self.depth + open_groups > self.max_depth {
            return Err(DecodeError::new(
                DecodeErrorKind::NestingTooDeep {
                    limit: self.max_depth,
                },
                self.offset(),
            ));
        }
        Ok(())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::wire::{MessageWriter, encode_varint};
    use proptest::prelude::*;

    proptest! {
        /// Any u64 survives a varint encode and decode
        #[test]
        fn varint_roundtrip(value in any::<u64>()) {
            let buf = MessageWriter::new().varint(1, value).finish();
            let mut reader = WireReader::new(&buf);
            let field = reader.next_field().unwrap().unwrap();
            prop_assert_eq!(field.as_u64().unwrap(), value);
            prop_assert!(reader.is_exhausted());
        }

        /// Cutting a multi-byte varint short always reports truncation
        #[test]
        fn truncated_varint_never_panics(value in (1u64 << 14)..u64::MAX, cut in 1usize..3) {
            let mut buf = vec![0x08];
            encode_varint(value, &mut buf);
            buf.truncate(buf.len() - cut);
            let mut reader = WireReader::new(&buf);
            let err = reader.next_field().unwrap_err();
            prop_assert_eq!(err.kind, DecodeErrorKind::TruncatedMessage);
        }

        /// Arbitrary bytes never panic and never report an offset past the end
        #[test]
        fn arbitrary_bytes_are_total(buf in proptest::collection::vec(any::<u8>(), 0..64)) {
            let mut reader = WireReader::new(&buf);
            loop {
                match reader.next_field() {
                    Ok(Some(field)) => prop_assert!(field.value_offset <= buf.len()),
                    Ok(None) => break,
                    Err(err) => {
                        prop_assert!(err.offset.unwrap_or(0) <= buf.len());
                        break;
                    }
                }
            }
        }
    }
}
