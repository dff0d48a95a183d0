//! Decode error types.

use std::fmt;

use super::WireType;
use crate::domain::MalformedScalar;

/// What went wrong while decoding a binary buffer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeErrorKind {
    /// The buffer ended in the middle of a field
    #[error("truncated message")]
    TruncatedMessage,

    /// A varint ran past ten bytes or overflowed 64 bits
    #[error("varint overflows 64 bits")]
    VarintOverflow,

    /// A tag carried field number zero or one above the protocol maximum
    #[error("invalid field number")]
    InvalidFieldNumber,

    /// A tag carried wire type 6 or 7
    #[error("invalid wire type {0}")]
    InvalidWireType(u8),

    /// A known field arrived with a different encoding than its schema type
    #[error("field {field} expected {expected} but found {found}")]
    WireTypeMismatch {
        field: u32,
        expected: WireType,
        found: WireType,
    },

    /// An end-group tag without a matching start, or a group left open
    #[error("unmatched group tag")]
    UnmatchedGroup,

    /// Nested messages or groups exceeded the configured depth
    #[error("nesting deeper than {limit} levels")]
    NestingTooDeep { limit: usize },

    /// A string field was not valid UTF-8
    #[error("{field} is not valid UTF-8")]
    InvalidUtf8 { field: &'static str },

    /// A value decoded cleanly but is not a valid domain scalar
    #[error("{0}")]
    MalformedScalar(MalformedScalar),

    /// A field the schema marks as required was absent
    #[error("missing required field {0}")]
    MissingRequiredField(&'static str),

    /// The input exceeded the caller's buffer guard
    #[error("buffer of {len} bytes exceeds limit of {limit}")]
    BufferTooLarge { len: usize, limit: usize },
}

impl DecodeErrorKind {
    /// Guard violations always abort a decode, whatever the substructure policy.
    pub fn is_limit(&self) -> bool {
        matches!(
            self,
            DecodeErrorKind::NestingTooDeep { .. } | DecodeErrorKind::BufferTooLarge { .. }
        )
    }
}

/// A decode failure with the absolute byte offset where it was detected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
    pub kind: DecodeErrorKind,
    pub offset: Option<usize>,
}

impl DecodeError {
    pub fn new(kind: DecodeErrorKind, offset: usize) -> Self {
        Self {
            kind,
            offset: Some(offset),
        }
    }

    pub fn without_offset(kind: DecodeErrorKind) -> Self {
        Self { kind, offset: None }
    }

    pub fn missing(field: &'static str, offset: usize) -> Self {
        Self::new(DecodeErrorKind::MissingRequiredField(field), offset)
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(offset) = self.offset {
            write!(f, " at byte {offset}")?;
        }
        Ok(())
    }
}

impl std::error::Error for DecodeError {}
