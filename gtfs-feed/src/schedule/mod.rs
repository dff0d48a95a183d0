//! Static GTFS feeds.
//!
//! [`load_feed`] takes already tokenized tables and either builds a
//! [`Feed`] or returns a [`ValidationReport`] listing every problem found.
//! Loading runs in two passes. The first parses each row on its own; the
//! second resolves references between tables, including parent stations
//! that appear later in `stops` than their children.

mod config;
mod enums;
mod feed;
mod load;
mod records;
mod report;
mod rows;
#[cfg(test)]
mod testing;
mod validate;

pub use config::{LoadConfig, UnknownEnumPolicy};
pub use enums::{
    Availability, DirectionId, ExceptionType, LocationType, PickupDropOff, RouteType, Timepoint,
};
pub use feed::Feed;
pub use load::load_feed;
pub use records::{Agency, Calendar, CalendarDate, Route, ShapePoint, Stop, StopTime, Trip};
pub use report::{RowRef, ValidationReport, Violation, ViolationKind};
pub use rows::{Row, TableName, TableSet};
