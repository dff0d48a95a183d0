//! WGS84 coordinates.

use std::fmt;

use super::error::{MalformedScalar, ScalarKind};

/// A latitude/longitude pair in decimal degrees.
///
/// Latitude is within [-90, 90] and longitude within [-180, 180], inclusive.
/// Values outside those ranges are rejected rather than clamped.
///
/// # Examples
///
/// ```
/// use gtfs_feed::domain::Coordinate;
///
/// let c = Coordinate::new(51.5308, -0.1238).unwrap();
/// assert_eq!(c.latitude(), 51.5308);
///
/// assert!(Coordinate::new(90.0, 180.0).is_ok());
/// assert!(Coordinate::new(90.5, 0.0).is_err());
/// ```
#[derive(Clone, Copy, PartialEq)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, MalformedScalar> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(MalformedScalar {
                scalar: ScalarKind::Coordinate,
                input: format!("{latitude},{longitude}"),
                reason: "latitude must be within [-90, 90]",
            });
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(MalformedScalar {
                scalar: ScalarKind::Coordinate,
                input: format!("{latitude},{longitude}"),
                reason: "longitude must be within [-180, 180]",
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Parse from the textual latitude and longitude columns of a row.
    pub fn parse(latitude: &str, longitude: &str) -> Result<Self, MalformedScalar> {
        let input = || format!("{latitude},{longitude}");
        let lat: f64 = latitude.trim().parse().map_err(|_| MalformedScalar {
            scalar: ScalarKind::Coordinate,
            input: input(),
            reason: "latitude is not a number",
        })?;
        let lon: f64 = longitude.trim().parse().map_err(|_| MalformedScalar {
            scalar: ScalarKind::Coordinate,
            input: input(),
            reason: "longitude is not a number",
        })?;
        Self::new(lat, lon).map_err(|e| MalformedScalar {
            input: input(),
            ..e
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Debug for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coordinate({}, {})", self.latitude, self.longitude)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}
