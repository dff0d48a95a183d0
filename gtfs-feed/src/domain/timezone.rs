//! IANA timezone identifiers.

use std::fmt;

use super::error::{MalformedScalar, ScalarKind};

/// A syntactically valid IANA timezone name such as `Europe/London`.
///
/// Only the shape of the identifier is checked; there is no lookup against
/// the tz database, so a well-formed but unknown zone is accepted.
///
/// # Examples
///
/// ```
/// use gtfs_feed::domain::Timezone;
///
/// assert!(Timezone::parse("America/Argentina/Buenos_Aires").is_ok());
/// assert!(Timezone::parse("Etc/GMT+5").is_ok());
/// assert!(Timezone::parse("UTC").is_ok());
///
/// assert!(Timezone::parse("Europe/").is_err());
/// assert!(Timezone::parse("Europe London").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Timezone(String);

impl Timezone {
    pub fn parse(s: &str) -> Result<Self, MalformedScalar> {
        if s.is_empty() {
            return Err(MalformedScalar::new(
                ScalarKind::Timezone,
                s,
                "timezone cannot be empty",
            ));
        }
        if !s.as_bytes()[0].is_ascii_alphabetic() {
            return Err(MalformedScalar::new(
                ScalarKind::Timezone,
                s,
                "must start with a letter",
            ));
        }

        for segment in s.split('/') {
            if segment.is_empty() {
                return Err(MalformedScalar::new(
                    ScalarKind::Timezone,
                    s,
                    "empty path segment",
                ));
            }
            if !segment
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'+'))
            {
                return Err(MalformedScalar::new(
                    ScalarKind::Timezone,
                    s,
                    "unexpected character",
                ));
            }
        }

        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Timezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timezone({})", self.0)
    }
}

impl fmt::Display for Timezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
