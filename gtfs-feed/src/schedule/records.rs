//! Validated static feed records, one type per table.
//!
//! Records hold references to other tables as id strings. Those ids are
//! checked by the loader before a [`Feed`](super::Feed) is built, so lookups
//! through the feed never dangle.

use chrono::Weekday;

use super::enums::{
    Availability, DirectionId, ExceptionType, LocationType, PickupDropOff, RouteType, Timepoint,
};
use crate::domain::{Color, Coordinate, LanguageCode, ServiceDate, ServiceTime, Timezone};

#[derive(Debug, Clone, PartialEq)]
pub struct Agency {
    /// May only be absent when the feed has a single agency.
    pub id: Option<String>,
    pub name: String,
    pub url: String,
    pub timezone: Timezone,
    pub lang: Option<LanguageCode>,
    pub phone: Option<String>,
    pub fare_url: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    pub id: String,
    pub code: Option<String>,
    pub name: Option<String>,
    pub desc: Option<String>,
    /// Required for stops, stations and entrances.
    pub coordinate: Option<Coordinate>,
    pub zone_id: Option<String>,
    pub url: Option<String>,
    pub location_type: LocationType,
    pub parent_station: Option<String>,
    pub timezone: Option<Timezone>,
    pub wheelchair_boarding: Availability,
    pub platform_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub id: String,
    pub agency_id: Option<String>,
    pub short_name: Option<String>,
    pub long_name: Option<String>,
    pub desc: Option<String>,
    pub route_type: RouteType,
    pub url: Option<String>,
    pub color: Color,
    pub text_color: Color,
    pub sort_order: Option<u32>,
}

impl Route {
    /// Short name if there is one, else the long name.
    pub fn display_name(&self) -> &str {
        self.short_name
            .as_deref()
            .or(self.long_name.as_deref())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trip {
    pub id: String,
    pub route_id: String,
    pub service_id: String,
    pub headsign: Option<String>,
    pub short_name: Option<String>,
    pub direction_id: Option<DirectionId>,
    pub block_id: Option<String>,
    pub shape_id: Option<String>,
    pub wheelchair_accessible: Availability,
    pub bikes_allowed: Availability,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StopTime {
    pub trip_id: String,
    pub arrival_time: Option<ServiceTime>,
    pub departure_time: Option<ServiceTime>,
    pub stop_id: String,
    pub stop_sequence: u32,
    pub stop_headsign: Option<String>,
    pub pickup_type: PickupDropOff,
    pub drop_off_type: PickupDropOff,
    pub shape_dist_traveled: Option<f64>,
    pub timepoint: Timepoint,
}

/// Weekly service pattern between two dates, inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calendar {
    pub service_id: String,
    pub monday: bool,
    pub tuesday: bool,
    pub wednesday: bool,
    pub thursday: bool,
    pub friday: bool,
    pub saturday: bool,
    pub sunday: bool,
    pub start_date: ServiceDate,
    pub end_date: ServiceDate,
}

impl Calendar {
    pub fn runs_on(&self, weekday: Weekday) -> bool {
        match weekday {
            Weekday::Mon => self.monday,
            Weekday::Tue => self.tuesday,
            Weekday::Wed => self.wednesday,
            Weekday::Thu => self.thursday,
            Weekday::Fri => self.friday,
            Weekday::Sat => self.saturday,
            Weekday::Sun => self.sunday,
        }
    }

    /// Whether the weekly pattern alone schedules service on `date`.
    pub fn covers(&self, date: ServiceDate) -> bool {
        self.start_date <= date && date <= self.end_date && self.runs_on(date.weekday())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDate {
    pub service_id: String,
    pub date: ServiceDate,
    pub exception_type: ExceptionType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShapePoint {
    pub shape_id: String,
    pub coordinate: Coordinate,
    pub sequence: u32,
    pub dist_traveled: Option<f64>,
}
