//! GTFS-realtime feed messages.
//!
//! [`decode_feed`] turns a protocol buffer into a [`FeedMessage`]. The
//! envelope must be well formed; malformed nested structures are contained
//! according to [`SubstructurePolicy`]. Decoded messages are plain values
//! that can be queried with the methods in this module.

mod config;
mod decode;
mod enums;
pub mod fields;
mod model;
mod query;

pub use config::{DecodeConfig, SubstructurePolicy};
pub use decode::{DecodeOutcome, DecodeWarning, decode_feed, decode_feed_with};
pub use enums::{
    Cause, CongestionLevel, Effect, Incrementality, OccupancyStatus, SeverityLevel,
    StopTimeScheduleRelationship, TripScheduleRelationship, VehicleStopStatus,
};
pub use model::{
    Alert, EntityKind, EntityPayload, EntitySelector, FeedEntity, FeedHeader, FeedMessage,
    Position, StopTimeEvent, StopTimeUpdate, TimeRange, TranslatedString, Translation,
    TripDescriptor, TripUpdate, VehicleDescriptor, VehiclePosition,
};
