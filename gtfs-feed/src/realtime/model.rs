//! Typed GTFS-realtime feed messages.
//!
//! These types mirror the protocol schema field for field, but scalar
//! fields that the schema marks optional are `Option` so that "absent" and
//! "zero" stay distinguishable. Values are immutable once decoded.

use chrono::{DateTime, Utc};

use super::enums::{
    Cause, CongestionLevel, Effect, Incrementality, OccupancyStatus, SeverityLevel,
    StopTimeScheduleRelationship, TripScheduleRelationship, VehicleStopStatus,
};
use crate::domain::{Coordinate, MalformedScalar, ServiceDate, ServiceTime};

/// Convert a POSIX timestamp into a UTC datetime.
fn posix(seconds: u64) -> Option<DateTime<Utc>> {
    i64::try_from(seconds)
        .ok()
        .and_then(|s| DateTime::from_timestamp(s, 0))
}

/// One decoded realtime feed.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedMessage {
    pub header: FeedHeader,
    /// Entities in the order the publisher emitted them.
    pub entities: Vec<FeedEntity>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedHeader {
    /// Protocol version, e.g. "2.0".
    pub gtfs_realtime_version: String,
    pub incrementality: Incrementality,
    /// POSIX seconds at which the feed content was created.
    pub timestamp: Option<u64>,
    pub feed_version: Option<String>,
}

impl FeedHeader {
    pub fn timestamp_utc(&self) -> Option<DateTime<Utc>> {
        self.timestamp.and_then(posix)
    }
}

/// One update record inside a feed message.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedEntity {
    pub id: String,
    pub is_deleted: bool,
    /// `None` when the publisher sent no payload field at all.
    pub payload: Option<EntityPayload>,
}

/// The oneof payload of a [`FeedEntity`].
#[derive(Debug, Clone, PartialEq)]
pub enum EntityPayload {
    TripUpdate(TripUpdate),
    VehiclePosition(VehiclePosition),
    Alert(Alert),
}

/// Discriminant of [`EntityPayload`], for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    TripUpdate,
    VehiclePosition,
    Alert,
}

impl EntityPayload {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityPayload::TripUpdate(_) => EntityKind::TripUpdate,
            EntityPayload::VehiclePosition(_) => EntityKind::VehiclePosition,
            EntityPayload::Alert(_) => EntityKind::Alert,
        }
    }
}

impl FeedEntity {
    pub fn kind(&self) -> Option<EntityKind> {
        self.payload.as_ref().map(EntityPayload::kind)
    }

    pub fn trip_update(&self) -> Option<&TripUpdate> {
        match &self.payload {
            Some(EntityPayload::TripUpdate(tu)) => Some(tu),
            _ => None,
        }
    }

    pub fn vehicle_position(&self) -> Option<&VehiclePosition> {
        match &self.payload {
            Some(EntityPayload::VehiclePosition(vp)) => Some(vp),
            _ => None,
        }
    }

    pub fn alert(&self) -> Option<&Alert> {
        match &self.payload {
            Some(EntityPayload::Alert(alert)) => Some(alert),
            _ => None,
        }
    }
}

/// Identifies the scheduled trip an update refers to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripDescriptor {
    pub trip_id: Option<String>,
    pub route_id: Option<String>,
    pub direction_id: Option<u32>,
    /// Service-relative start time as published ("HH:MM:SS", may exceed 24h).
    pub start_time: Option<String>,
    /// Service date as published ("YYYYMMDD").
    pub start_date: Option<String>,
    pub schedule_relationship: Option<TripScheduleRelationship>,
}

impl TripDescriptor {
    /// Parse the published start date, if any.
    pub fn service_date(&self) -> Result<Option<ServiceDate>, MalformedScalar> {
        self.start_date.as_deref().map(ServiceDate::parse).transpose()
    }

    /// Parse the published start time, if any.
    pub fn service_start_time(&self) -> Result<Option<ServiceTime>, MalformedScalar> {
        self.start_time.as_deref().map(ServiceTime::parse).transpose()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VehicleDescriptor {
    pub id: Option<String>,
    pub label: Option<String>,
    pub license_plate: Option<String>,
}

/// Realtime predictions for one trip.
#[derive(Debug, Clone, PartialEq)]
pub struct TripUpdate {
    pub trip: TripDescriptor,
    pub vehicle: Option<VehicleDescriptor>,
    /// Per-stop predictions in publisher order.
    pub stop_time_updates: Vec<StopTimeUpdate>,
    pub timestamp: Option<u64>,
    pub delay: Option<i32>,
}

impl TripUpdate {
    pub fn timestamp_utc(&self) -> Option<DateTime<Utc>> {
        self.timestamp.and_then(posix)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StopTimeUpdate {
    pub stop_sequence: Option<u32>,
    pub stop_id: Option<String>,
    pub arrival: Option<StopTimeEvent>,
    pub departure: Option<StopTimeEvent>,
    pub schedule_relationship: StopTimeScheduleRelationship,
}

/// Timing of one arrival or departure, as a delay and/or absolute time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StopTimeEvent {
    /// Seconds late (negative for early).
    pub delay: Option<i32>,
    /// POSIX seconds.
    pub time: Option<i64>,
    pub uncertainty: Option<i32>,
}

impl StopTimeEvent {
    pub fn time_utc(&self) -> Option<DateTime<Utc>> {
        self.time.and_then(|t| DateTime::from_timestamp(t, 0))
    }
}

/// Geographic position of a vehicle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub coordinate: Coordinate,
    /// Degrees clockwise from true north.
    pub bearing: Option<f32>,
    /// Meters.
    pub odometer: Option<f64>,
    /// Meters per second.
    pub speed: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VehiclePosition {
    pub trip: Option<TripDescriptor>,
    pub vehicle: Option<VehicleDescriptor>,
    pub position: Option<Position>,
    pub current_stop_sequence: Option<u32>,
    pub stop_id: Option<String>,
    pub current_status: Option<VehicleStopStatus>,
    pub timestamp: Option<u64>,
    pub congestion_level: Option<CongestionLevel>,
    pub occupancy_status: Option<OccupancyStatus>,
    pub occupancy_percentage: Option<u32>,
}

impl VehiclePosition {
    pub fn timestamp_utc(&self) -> Option<DateTime<Utc>> {
        self.timestamp.and_then(posix)
    }
}

/// A service disruption notice.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Alert {
    pub active_periods: Vec<TimeRange>,
    pub informed_entities: Vec<EntitySelector>,
    pub cause: Cause,
    pub effect: Effect,
    pub url: Option<TranslatedString>,
    pub header_text: Option<TranslatedString>,
    pub description_text: Option<TranslatedString>,
    pub severity_level: SeverityLevel,
}

impl Alert {
    /// An alert with no active periods is active for as long as it is published.
    pub fn is_active_at(&self, timestamp: u64) -> bool {
        self.active_periods.is_empty()
            || self.active_periods.iter().any(|p| p.contains(timestamp))
    }
}

/// Interval in POSIX seconds; a missing bound is open-ended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeRange {
    pub start: Option<u64>,
    pub end: Option<u64>,
}

impl TimeRange {
    pub fn contains(&self, timestamp: u64) -> bool {
        self.start.is_none_or(|start| timestamp >= start)
            && self.end.is_none_or(|end| timestamp <= end)
    }
}

/// Selects the part of the network an alert applies to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntitySelector {
    pub agency_id: Option<String>,
    pub route_id: Option<String>,
    pub route_type: Option<i32>,
    pub trip: Option<TripDescriptor>,
    pub stop_id: Option<String>,
    pub direction_id: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslatedString {
    pub translations: Vec<Translation>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Translation {
    pub text: String,
    /// BCP-47 tag as published; `None` marks the default text.
    pub language: Option<String>,
}

impl TranslatedString {
    /// Text for a language, falling back to the untagged translation and then
    /// to whichever translation came first.
    pub fn text_for(&self, language: &str) -> Option<&str> {
        self.translations
            .iter()
            .find(|t| {
                t.language
                    .as_deref()
                    .is_some_and(|l| l.eq_ignore_ascii_case(language))
            })
            .or_else(|| self.translations.iter().find(|t| t.language.is_none()))
            .or_else(|| self.translations.first())
            .map(|t| t.text.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translation(text: &str, language: Option<&str>) -> Translation {
        Translation {
            text: text.to_string(),
            language: language.map(str::to_string),
        }
    }

    #[test]
    fn text_for_prefers_exact_language() {
        let s = TranslatedString {
            translations: vec![
                translation("Default", None),
                translation("Bonjour", Some("fr")),
                translation("Hello", Some("EN")),
            ],
        };
        assert_eq!(s.text_for("en"), Some("Hello"));
        assert_eq!(s.text_for("fr"), Some("Bonjour"));
        assert_eq!(s.text_for("de"), Some("Default"));
    }

    #[test]
    fn text_for_falls_back_to_first() {
        let s = TranslatedString {
            translations: vec![translation("Hallo", Some("de"))],
        };
        assert_eq!(s.text_for("en"), Some("Hallo"));
        assert_eq!(TranslatedString::default().text_for("en"), None);
    }

    #[test]
    fn time_range_bounds_are_inclusive_and_open_ended() {
        let closed = TimeRange {
            start: Some(100),
            end: Some(200),
        };
        assert!(closed.contains(100));
        assert!(closed.contains(200));
        assert!(!closed.contains(99));
        assert!(!closed.contains(201));

        let open_start = TimeRange {
            start: None,
            end: Some(50),
        };
        assert!(open_start.contains(0));
        assert!(!open_start.contains(51));
    }

    #[test]
    fn alert_activity() {
        let mut alert = Alert::default();
        assert!(alert.is_active_at(12345));

        alert.active_periods.push(TimeRange {
            start: Some(10),
            end: Some(20),
        });
        alert.active_periods.push(TimeRange {
            start: Some(30),
            end: None,
        });
        assert!(alert.is_active_at(15));
        assert!(!alert.is_active_at(25));
        assert!(alert.is_active_at(1_000_000));
    }

    #[test]
    fn trip_descriptor_scalars() {
        let trip = TripDescriptor {
            start_date: Some("20240315".to_string()),
            start_time: Some("25:10:00".to_string()),
            ..TripDescriptor::default()
        };
        assert_eq!(
            trip.service_date().unwrap(),
            Some(ServiceDate::parse("20240315").unwrap())
        );
        assert_eq!(
            trip.service_start_time().unwrap().unwrap().total_seconds(),
            25 * 3600 + 600
        );

        let bad = TripDescriptor {
            start_date: Some("2024-03-15".to_string()),
            ..TripDescriptor::default()
        };
        assert!(bad.service_date().is_err());
        assert_eq!(TripDescriptor::default().service_date().unwrap(), None);
    }

    #[test]
    fn header_timestamp() {
        let header = FeedHeader {
            gtfs_realtime_version: "2.0".to_string(),
            incrementality: Incrementality::FullDataset,
            timestamp: Some(1_700_000_000),
            feed_version: None,
        };
        assert_eq!(
            header.timestamp_utc().unwrap().to_rfc3339(),
            "2023-11-14T22:13:20+00:00"
        );
    }
}
