//! Scalar validation errors.

use std::fmt;

/// Which kind of scalar failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Date,
    Time,
    Coordinate,
    Color,
    Timezone,
    LanguageCode,
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScalarKind::Date => "date",
            ScalarKind::Time => "time",
            ScalarKind::Coordinate => "coordinate",
            ScalarKind::Color => "color",
            ScalarKind::Timezone => "timezone",
            ScalarKind::LanguageCode => "language code",
        };
        f.write_str(name)
    }
}

/// Error returned when a raw literal is not a valid domain scalar.
///
/// Carries the offending input verbatim so callers can report it without
/// re-reading the source row.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {scalar} {input:?}: {reason}")]
pub struct MalformedScalar {
    pub scalar: ScalarKind,
    pub input: String,
    pub reason: &'static str,
}

impl MalformedScalar {
    pub(crate) fn new(scalar: ScalarKind, input: &str, reason: &'static str) -> Self {
        Self {
            scalar,
            input: input.to_string(),
            reason,
        }
    }
}
