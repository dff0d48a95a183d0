//! Service-relative times of day.
//!
//! GTFS expresses stop times as "HH:MM:SS" measured from midnight of the
//! service day (strictly, noon minus twelve hours). Trips that run past
//! midnight keep counting: a trip arriving at 01:30 the next morning is
//! written "25:30:00". These values are elapsed seconds, not wall-clock
//! times, and are never wrapped modulo a day.

use std::fmt;

use chrono::Duration;

use super::error::{MalformedScalar, ScalarKind};

const SECONDS_PER_MINUTE: u32 = 60;
const SECONDS_PER_HOUR: u32 = 3600;

/// Elapsed seconds since the start of a service day.
///
/// # Examples
///
/// ```
/// use gtfs_feed::domain::ServiceTime;
///
/// let t = ServiceTime::parse("25:30:00").unwrap();
/// assert_eq!(t.total_seconds(), 91_800);
/// assert_eq!(t.hours(), 25);
/// assert_eq!(t.to_string(), "25:30:00");
///
/// // Single-digit hours are accepted
/// assert_eq!(ServiceTime::parse("8:05:00").unwrap().to_string(), "08:05:00");
///
/// // Minutes and seconds are still bounded
/// assert!(ServiceTime::parse("12:60:00").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServiceTime(u32);

impl ServiceTime {
    /// Create a time from a raw count of seconds.
    pub fn from_seconds(seconds: u32) -> Self {
        Self(seconds)
    }

    /// Parse a time from "H:MM:SS" or "HH:MM:SS" format.
    ///
    /// The hour field has no upper bound beyond what fits in the seconds
    /// counter; minutes and seconds must be 00-59.
    pub fn parse(s: &str) -> Result<Self, MalformedScalar> {
        let mut parts = s.split(':');
        let (Some(h), Some(m), Some(sec), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(MalformedScalar::new(
                ScalarKind::Time,
                s,
                "expected HH:MM:SS format",
            ));
        };

        if h.is_empty() || !h.bytes().all(|b| b.is_ascii_digit()) {
            return Err(MalformedScalar::new(
                ScalarKind::Time,
                s,
                "invalid hour digits",
            ));
        }
        let hours: u32 = h
            .parse()
            .map_err(|_| MalformedScalar::new(ScalarKind::Time, s, "hour out of range"))?;

        let minutes = parse_two_digits(m.as_bytes())
            .ok_or_else(|| MalformedScalar::new(ScalarKind::Time, s, "invalid minute digits"))?;
        if minutes > 59 {
            return Err(MalformedScalar::new(
                ScalarKind::Time,
                s,
                "minute must be 0-59",
            ));
        }

        let seconds = parse_two_digits(sec.as_bytes())
            .ok_or_else(|| MalformedScalar::new(ScalarKind::Time, s, "invalid second digits"))?;
        if seconds > 59 {
            return Err(MalformedScalar::new(
                ScalarKind::Time,
                s,
                "second must be 0-59",
            ));
        }

        hours
            .checked_mul(SECONDS_PER_HOUR)
            .and_then(|h| h.checked_add(minutes * SECONDS_PER_MINUTE + seconds))
            .map(ServiceTime)
            .ok_or_else(|| MalformedScalar::new(ScalarKind::Time, s, "hour out of range"))
    }

    /// Seconds since the start of the service day.
    pub fn total_seconds(&self) -> u32 {
        self.0
    }

    /// Hours component, which may be 24 or more.
    pub fn hours(&self) -> u32 {
        self.0 / SECONDS_PER_HOUR
    }

    pub fn minutes(&self) -> u32 {
        (self.0 % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE
    }

    pub fn seconds(&self) -> u32 {
        self.0 % SECONDS_PER_MINUTE
    }

    /// Returns true if this time falls on the following calendar day.
    pub fn is_past_midnight(&self) -> bool {
        self.hours() >= 24
    }

    /// Converts to a chrono Duration from the service-day origin.
    pub fn as_duration(&self) -> Duration {
        Duration::seconds(i64::from(self.0))
    }

    /// Returns the duration between two times.
    ///
    /// Returns a negative duration if `other` is after `self`.
    pub fn signed_duration_since(&self, other: Self) -> Duration {
        Duration::seconds(i64::from(self.0) - i64::from(other.0))
    }
}

/// Parse two ASCII digit bytes into a u32.
fn parse_two_digits(bytes: &[u8]) -> Option<u32> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = (bytes[0] as char).to_digit(10)?;
    let d2 = (bytes[1] as char).to_digit(10)?;
    Some(d1 * 10 + d2)
}

impl fmt::Debug for ServiceTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ServiceTime({self})")
    }
}

impl fmt::Display for ServiceTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hours(),
            self.minutes(),
            self.seconds()
        )
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Elapsed seconds are exactly HH*3600+MM*60+SS, including past 24:00
        #[test]
        fn elapsed_seconds_exact(h in 0u32..48, m in 0u32..60, s in 0u32..60) {
            let literal = format!("{h:02}:{m:02}:{s:02}");
            let t = ServiceTime::parse(&literal).unwrap();
            prop_assert_eq!(t.total_seconds(), h * 3600 + m * 60 + s);
            prop_assert_eq!(t.to_string(), literal);
        }

        /// Out-of-range minutes are always rejected
        #[test]
        fn minutes_out_of_range_rejected(h in 0u32..48, m in 60u32..100, s in 0u32..60) {
            let literal = format!("{h:02}:{m:02}:{s:02}");
            prop_assert!(ServiceTime::parse(&literal).is_err());
        }

        /// from_seconds then display then parse gives back the same value
        #[test]
        fn seconds_roundtrip(secs in 0u32..(1000 * 3600)) {
            let t = ServiceTime::from_seconds(secs);
            prop_assert_eq!(ServiceTime::parse(&t.to_string()).unwrap(), t);
        }
    }
}
