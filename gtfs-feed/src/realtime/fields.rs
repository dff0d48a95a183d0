//! GTFS-realtime field numbering.
//!
//! These numbers are fixed by `gtfs-realtime.proto` and never change
//! between protocol versions; new fields only ever get new numbers.
//! Anything not listed here is skipped by the decoder.

pub mod feed_message {
    pub const HEADER: u32 = 1;
    pub const ENTITY: u32 = 2;
}

pub mod feed_header {
    pub const GTFS_REALTIME_VERSION: u32 = 1;
    pub const INCREMENTALITY: u32 = 2;
    pub const TIMESTAMP: u32 = 3;
    pub const FEED_VERSION: u32 = 4;
}

pub mod feed_entity {
    pub const ID: u32 = 1;
    pub const IS_DELETED: u32 = 2;
    pub const TRIP_UPDATE: u32 = 3;
    pub const VEHICLE: u32 = 4;
    pub const ALERT: u32 = 5;
}

pub mod trip_update {
    pub const TRIP: u32 = 1;
    pub const STOP_TIME_UPDATE: u32 = 2;
    pub const VEHICLE: u32 = 3;
    pub const TIMESTAMP: u32 = 4;
    pub const DELAY: u32 = 5;
}

pub mod stop_time_event {
    pub const DELAY: u32 = 1;
    pub const TIME: u32 = 2;
    pub const UNCERTAINTY: u32 = 3;
}

pub mod stop_time_update {
    pub const STOP_SEQUENCE: u32 = 1;
    pub const ARRIVAL: u32 = 2;
    pub const DEPARTURE: u32 = 3;
    pub const STOP_ID: u32 = 4;
    pub const SCHEDULE_RELATIONSHIP: u32 = 5;
}

pub mod vehicle_position {
    pub const TRIP: u32 = 1;
    pub const POSITION: u32 = 2;
    pub const CURRENT_STOP_SEQUENCE: u32 = 3;
    pub const CURRENT_STATUS: u32 = 4;
    pub const TIMESTAMP: u32 = 5;
    pub const CONGESTION_LEVEL: u32 = 6;
    pub const STOP_ID: u32 = 7;
    pub const VEHICLE: u32 = 8;
    pub const OCCUPANCY_STATUS: u32 = 9;
    pub const OCCUPANCY_PERCENTAGE: u32 = 10;
}

pub mod position {
    pub const LATITUDE: u32 = 1;
    pub const LONGITUDE: u32 = 2;
    pub const BEARING: u32 = 3;
    pub const ODOMETER: u32 = 4;
    pub const SPEED: u32 = 5;
}

pub mod trip_descriptor {
    pub const TRIP_ID: u32 = 1;
    pub const START_TIME: u32 = 2;
    pub const START_DATE: u32 = 3;
    pub const SCHEDULE_RELATIONSHIP: u32 = 4;
    pub const ROUTE_ID: u32 = 5;
    pub const DIRECTION_ID: u32 = 6;
}

pub mod vehicle_descriptor {
    pub const ID: u32 = 1;
    pub const LABEL: u32 = 2;
    pub const LICENSE_PLATE: u32 = 3;
}

pub mod alert {
    pub const ACTIVE_PERIOD: u32 = 1;
    pub const INFORMED_ENTITY: u32 = 5;
    pub const CAUSE: u32 = 6;
    pub const EFFECT: u32 = 7;
    pub const URL: u32 = 8;
    pub const HEADER_TEXT: u32 = 10;
    pub const DESCRIPTION_TEXT: u32 = 11;
    pub const SEVERITY_LEVEL: u32 = 14;
}

pub mod time_range {
    pub const START: u32 = 1;
    pub const END: u32 = 2;
}

pub mod entity_selector {
    pub const AGENCY_ID: u32 = 1;
    pub const ROUTE_ID: u32 = 2;
    pub const ROUTE_TYPE: u32 = 3;
    pub const TRIP: u32 = 4;
    pub const STOP_ID: u32 = 5;
    pub const DIRECTION_ID: u32 = 6;
}

pub mod translated_string {
    pub const TRANSLATION: u32 = 1;
}

pub mod translation {
    pub const TEXT: u32 = 1;
    pub const LANGUAGE: u32 = 2;
}
