//! Service calendar dates.

use std::fmt;

use chrono::{Datelike, NaiveDate, Weekday};

use super::error::{MalformedScalar, ScalarKind};

/// A calendar date in GTFS `YYYYMMDD` form.
///
/// # Examples
///
/// ```
/// use gtfs_feed::domain::ServiceDate;
///
/// let date = ServiceDate::parse("20240315").unwrap();
/// assert_eq!(date.year(), 2024);
/// assert_eq!(date.month(), 3);
/// assert_eq!(date.day(), 15);
/// assert_eq!(date.to_string(), "20240315");
///
/// // Month 13 does not exist
/// assert!(ServiceDate::parse("20241315").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServiceDate(NaiveDate);

impl ServiceDate {
    /// Parse an 8-digit `YYYYMMDD` literal.
    pub fn parse(s: &str) -> Result<Self, MalformedScalar> {
        let bytes = s.as_bytes();
        if bytes.len() != 8 {
            return Err(MalformedScalar::new(
                ScalarKind::Date,
                s,
                "expected YYYYMMDD format",
            ));
        }
        if !bytes.iter().all(u8::is_ascii_digit) {
            return Err(MalformedScalar::new(
                ScalarKind::Date,
                s,
                "expected only digits",
            ));
        }

        let year = digits(&bytes[0..4]);
        let month = digits(&bytes[4..6]);
        let day = digits(&bytes[6..8]);

        if !(1..=12).contains(&month) {
            return Err(MalformedScalar::new(
                ScalarKind::Date,
                s,
                "month must be 01-12",
            ));
        }

        NaiveDate::from_ymd_opt(year as i32, month, day)
            .map(ServiceDate)
            .ok_or_else(|| MalformedScalar::new(ScalarKind::Date, s, "day out of range for month"))
    }

    /// Wrap an existing chrono date.
    pub fn from_naive(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    /// Returns the underlying chrono date.
    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }
}

/// Fold a run of ASCII digits into a number. Caller has checked the digits.
fn digits(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .fold(0, |acc, b| acc * 10 + u32::from(b - b'0'))
}

impl fmt::Debug for ServiceDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ServiceDate({self})")
    }
}

impl fmt::Display for ServiceDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}{:02}{:02}",
            self.year(),
            self.month(),
            self.day()
        )
    }
}
