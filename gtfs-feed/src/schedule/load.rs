//! Per-table row parsing.
//!
//! The first pass turns each row into a record, checking only what can be
//! checked from the row alone: required columns, scalar syntax, enum codes
//! and id uniqueness. Every problem is recorded and parsing moves on to the
//! next row. References between tables are left to [`super::validate`].

use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use tracing::{debug, warn};

use super::config::{LoadConfig, UnknownEnumPolicy};
use super::enums::{Coded, LocationType};
use super::feed::Feed;
use super::records::{Agency, Calendar, CalendarDate, Route, ShapePoint, Stop, StopTime, Trip};
use super::report::{RowRef, ValidationReport, Violation, ViolationKind};
use super::rows::{Row, TableName, TableSet};
use super::validate;
use crate::domain::{
    Color, Coordinate, LanguageCode, MalformedScalar, ServiceDate, ServiceTime, Timezone,
};

/// Load and validate a static feed.
///
/// Returns the feed only if every table is present and every row is valid;
/// otherwise returns all violations at once.
pub fn load_feed(tables: &TableSet, config: &LoadConfig) -> Result<Feed, ValidationReport> {
    let mut loader = Loader::new(config);
    let staged = loader.stage(tables);
    validate::check(&staged, &mut loader.violations);

    if !loader.violations.is_empty() {
        debug!(
            violations = loader.violations.len(),
            "static feed failed validation"
        );
        return Err(ValidationReport::new(loader.violations));
    }

    let feed = Feed::from_staged(staged);
    debug!(
        agencies = feed.agencies().len(),
        stops = feed.stops().len(),
        routes = feed.routes().len(),
        trips = feed.trips().len(),
        "static feed loaded"
    );
    Ok(feed)
}

/// A record together with the row it came from.
#[derive(Debug)]
pub(super) struct Sourced<T> {
    pub row: RowRef,
    pub record: T,
}

/// Records registered under their ids, in input order.
#[derive(Debug)]
pub(super) struct Keyed<T> {
    pub entries: Vec<Sourced<T>>,
    pub index: HashMap<String, usize>,
    /// Ids of rows that failed to parse. References to them are not
    /// reported again as dangling.
    pub rejected: HashSet<String>,
    /// The table tripped the row guard and none of its rows were read.
    pub skipped: bool,
}

impl<T> Keyed<T> {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            rejected: HashSet::new(),
            skipped: false,
        }
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.index.get(id).map(|&i| &self.entries[i].record)
    }

    /// Whether some row, valid or not, carries this id. Always true for a
    /// skipped table, whose ids are unknown.
    pub fn resolves(&self, id: &str) -> bool {
        self.skipped || self.index.contains_key(id) || self.rejected.contains(id)
    }
}

/// Records of a table without an id of its own, with the set of values
/// seen in its grouping column.
#[derive(Debug)]
pub(super) struct Grouped<T> {
    pub entries: Vec<Sourced<T>>,
    pub keys: HashSet<String>,
    pub skipped: bool,
}

impl<T> Grouped<T> {
    /// Like [`Keyed::resolves`], over the grouping column.
    pub fn resolves(&self, key: &str) -> bool {
        self.skipped || self.keys.contains(key)
    }
}

/// Output of the first pass.
#[derive(Debug)]
pub(super) struct Staged {
    pub agency_rows: usize,
    pub agencies: Keyed<Agency>,
    pub stops: Keyed<Stop>,
    pub routes: Keyed<Route>,
    pub trips: Keyed<Trip>,
    pub calendars: Keyed<Calendar>,
    pub calendar_dates: Grouped<CalendarDate>,
    pub stop_times: Grouped<StopTime>,
    pub shapes: Grouped<ShapePoint>,
    pub has_shapes: bool,
}

/// Marker for a row that has already been reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Rejected;

struct Loader<'c> {
    config: &'c LoadConfig,
    violations: Vec<Violation>,
}

impl<'c> Loader<'c> {
    fn new(config: &'c LoadConfig) -> Self {
        Self {
            config,
            violations: Vec::new(),
        }
    }

    fn report(&mut self, table: TableName, row: RowRef, kind: ViolationKind) {
        self.violations.push(Violation { table, row, kind });
    }

    fn stage(&mut self, tables: &TableSet) -> Staged {
        for table in TableName::ALL {
            if table.is_required() && !tables.contains(table) {
                self.report(table, RowRef::table(), ViolationKind::MissingTable);
            }
        }
        if !tables.contains(TableName::Calendar) && !tables.contains(TableName::CalendarDates) {
            self.report(
                TableName::Calendar,
                RowRef::table(),
                ViolationKind::MissingTable,
            );
        }

        let agency_rows = tables.get(TableName::Agency).map_or(0, <[Row]>::len);
        let agencies = self.keyed(tables, TableName::Agency, "agency_id", parse_agency);
        if agency_rows == 0 && tables.contains(TableName::Agency) {
            self.report(TableName::Agency, RowRef::table(), ViolationKind::EmptyTable);
        }
        if agency_rows > 1 {
            // With several agencies every one of them needs an id
            let anonymous: Vec<RowRef> = agencies
                .entries
                .iter()
                .filter(|e| e.record.id.is_none())
                .map(|e| e.row.clone())
                .collect();
            for row in anonymous {
                self.report(
                    TableName::Agency,
                    row,
                    ViolationKind::MissingColumn {
                        column: "agency_id",
                    },
                );
            }
        }

        let staged = Staged {
            agency_rows,
            agencies,
            stops: self.keyed(tables, TableName::Stops, "stop_id", parse_stop),
            routes: self.keyed(tables, TableName::Routes, "route_id", parse_route),
            trips: self.keyed(tables, TableName::Trips, "trip_id", parse_trip),
            calendars: self.keyed(tables, TableName::Calendar, "service_id", parse_calendar),
            calendar_dates: self.grouped(
                tables,
                TableName::CalendarDates,
                "service_id",
                parse_calendar_date,
            ),
            stop_times: self.grouped(tables, TableName::StopTimes, "trip_id", parse_stop_time),
            shapes: self.grouped(tables, TableName::Shapes, "shape_id", parse_shape_point),
            has_shapes: tables.contains(TableName::Shapes),
        };

        debug!(
            violations = self.violations.len(),
            "first pass over static tables complete"
        );
        staged
    }

    /// Rows of a table, or `None` if it trips the row guard.
    fn rows<'t>(&mut self, tables: &'t TableSet, table: TableName) -> Option<&'t [Row]> {
        let rows = tables.get(table).unwrap_or_default();
        match self.config.max_rows_per_table {
            Some(limit) if rows.len() > limit => {
                warn!(%table, rows = rows.len(), limit, "table exceeds row limit, skipping");
                self.report(
                    table,
                    RowRef::table(),
                    ViolationKind::RowLimitExceeded { limit },
                );
                None
            }
            _ => Some(rows),
        }
    }

    fn keyed<T>(
        &mut self,
        tables: &TableSet,
        table: TableName,
        id_column: &'static str,
        parse: fn(&mut RowReader<'_>) -> Result<T, Rejected>,
    ) -> Keyed<T> {
        let mut keyed = Keyed::new();
        let Some(rows) = self.rows(tables, table) else {
            keyed.skipped = true;
            return keyed;
        };

        for (i, row) in rows.iter().enumerate() {
            let id = row.get(id_column).map(str::to_string);
            let row_ref = RowRef::new(i + 1, id.clone());
            let record = self.parse_row(table, row_ref.clone(), row, parse);

            match (record, id) {
                (Ok(record), Some(id)) => {
                    if keyed.index.contains_key(&id) {
                        self.report(table, row_ref, ViolationKind::DuplicateId { id });
                    } else {
                        keyed.index.insert(id, keyed.entries.len());
                        keyed.entries.push(Sourced {
                            row: row_ref,
                            record,
                        });
                    }
                }
                (Ok(record), None) => keyed.entries.push(Sourced {
                    row: row_ref,
                    record,
                }),
                (Err(Rejected), Some(id)) => {
                    keyed.rejected.insert(id);
                }
                (Err(Rejected), None) => {}
            }
        }

        debug!(%table, rows = rows.len(), loaded = keyed.entries.len(), "loaded table");
        keyed
    }

    fn grouped<T>(
        &mut self,
        tables: &TableSet,
        table: TableName,
        key_column: &'static str,
        parse: fn(&mut RowReader<'_>) -> Result<T, Rejected>,
    ) -> Grouped<T> {
        let Some(rows) = self.rows(tables, table) else {
            return Grouped {
                entries: Vec::new(),
                keys: HashSet::new(),
                skipped: true,
            };
        };
        let mut grouped = Grouped {
            entries: Vec::with_capacity(rows.len()),
            keys: HashSet::new(),
            skipped: false,
        };

        for (i, row) in rows.iter().enumerate() {
            if let Some(key) = row.get(key_column) {
                grouped.keys.insert(key.to_string());
            }
            let row_ref = RowRef::new(i + 1, None);
            if let Ok(record) = self.parse_row(table, row_ref.clone(), row, parse) {
                grouped.entries.push(Sourced {
                    row: row_ref,
                    record,
                });
            }
        }

        debug!(%table, rows = rows.len(), loaded = grouped.entries.len(), "loaded table");
        grouped
    }

    fn parse_row<T>(
        &mut self,
        table: TableName,
        row_ref: RowRef,
        row: &Row,
        parse: fn(&mut RowReader<'_>) -> Result<T, Rejected>,
    ) -> Result<T, Rejected> {
        let mut reader = RowReader {
            table,
            row_ref,
            row,
            policy: self.config.unknown_enums,
            violations: Vec::new(),
        };
        let record = parse(&mut reader);
        self.violations.append(&mut reader.violations);
        record
    }
}

/// Typed access to the columns of one row.
///
/// Every failing accessor records a violation and returns [`Rejected`], so
/// callers read all columns first and combine the results afterwards. That
/// way one row reports all of its problems, not just the first.
pub(super) struct RowReader<'a> {
    table: TableName,
    row_ref: RowRef,
    row: &'a Row,
    policy: UnknownEnumPolicy,
    violations: Vec<Violation>,
}

impl RowReader<'_> {
    fn reject(&mut self, kind: ViolationKind) -> Rejected {
        self.violations.push(Violation {
            table: self.table,
            row: self.row_ref.clone(),
            kind,
        });
        Rejected
    }

    fn missing(&mut self, column: &'static str) -> Rejected {
        self.reject(ViolationKind::MissingColumn { column })
    }

    fn text(&self, column: &str) -> Option<String> {
        self.row.get(column).map(str::to_string)
    }

    fn required(&mut self, column: &'static str) -> Result<String, Rejected> {
        self.text(column).ok_or_else(|| self.missing(column))
    }

    fn scalar<T>(
        &mut self,
        column: &'static str,
        parse: fn(&str) -> Result<T, MalformedScalar>,
    ) -> Result<Option<T>, Rejected> {
        let row = self.row;
        row.get(column)
            .map(|raw| {
                parse(raw).map_err(|error| {
                    self.reject(ViolationKind::MalformedScalar { column, error })
                })
            })
            .transpose()
    }

    fn required_scalar<T>(
        &mut self,
        column: &'static str,
        parse: fn(&str) -> Result<T, MalformedScalar>,
    ) -> Result<T, Rejected> {
        self.scalar(column, parse)?
            .ok_or_else(|| self.missing(column))
    }

    fn number<T: FromStr>(&mut self, column: &'static str) -> Result<Option<T>, Rejected> {
        let row = self.row;
        row.get(column)
            .map(|raw| {
                raw.parse().map_err(|_| {
                    self.reject(ViolationKind::InvalidNumber {
                        column,
                        value: raw.to_string(),
                    })
                })
            })
            .transpose()
    }

    fn required_number<T: FromStr>(&mut self, column: &'static str) -> Result<T, Rejected> {
        self.number(column)?.ok_or_else(|| self.missing(column))
    }

    /// A non-negative finite distance.
    fn distance(&mut self, column: &'static str) -> Result<Option<f64>, Rejected> {
        match self.number::<f64>(column)? {
            Some(d) if !d.is_finite() || d < 0.0 => Err(self.reject(ViolationKind::InvalidNumber {
                column,
                value: d.to_string(),
            })),
            other => Ok(other),
        }
    }

    fn coded<T: Coded>(&mut self, column: &'static str) -> Result<Option<T>, Rejected> {
        let row = self.row;
        let Some(raw) = row.get(column) else {
            return Ok(None);
        };
        let Ok(code) = raw.parse::<i32>() else {
            return Err(self.reject(ViolationKind::InvalidNumber {
                column,
                value: raw.to_string(),
            }));
        };

        let value = T::from_code(code);
        if !value.is_recognized() && self.policy == UnknownEnumPolicy::Reject {
            return Err(self.reject(ViolationKind::UnknownEnumValue {
                column,
                value: raw.to_string(),
            }));
        }
        Ok(Some(value))
    }

    fn required_coded<T: Coded>(&mut self, column: &'static str) -> Result<T, Rejected> {
        self.coded(column)?.ok_or_else(|| self.missing(column))
    }

    /// A required `0`/`1` column.
    fn flag(&mut self, column: &'static str) -> Result<bool, Rejected> {
        let row = self.row;
        match row.get(column) {
            Some("1") => Ok(true),
            Some("0") => Ok(false),
            Some(other) => Err(self.reject(ViolationKind::UnknownEnumValue {
                column,
                value: other.to_string(),
            })),
            None => Err(self.missing(column)),
        }
    }

    /// A latitude/longitude column pair; absent only if both columns are.
    fn coordinate(
        &mut self,
        lat_column: &'static str,
        lon_column: &'static str,
    ) -> Result<Option<Coordinate>, Rejected> {
        let row = self.row;
        match (row.get(lat_column), row.get(lon_column)) {
            (None, None) => Ok(None),
            (Some(_), None) => Err(self.missing(lon_column)),
            (None, Some(_)) => Err(self.missing(lat_column)),
            (Some(lat), Some(lon)) => Coordinate::parse(lat, lon).map(Some).map_err(|error| {
                self.reject(ViolationKind::MalformedScalar {
                    column: lat_column,
                    error,
                })
            }),
        }
    }
}

fn parse_agency(r: &mut RowReader<'_>) -> Result<Agency, Rejected> {
    let name = r.required("agency_name");
    let url = r.required("agency_url");
    let timezone = r.required_scalar("agency_timezone", Timezone::parse);
    let lang = r.scalar("agency_lang", LanguageCode::parse);

    Ok(Agency {
        id: r.text("agency_id"),
        name: name?,
        url: url?,
        timezone: timezone?,
        lang: lang?,
        phone: r.text("agency_phone"),
        fare_url: r.text("agency_fare_url"),
        email: r.text("agency_email"),
    })
}

fn parse_stop(r: &mut RowReader<'_>) -> Result<Stop, Rejected> {
    let id = r.required("stop_id");
    let location_type = r.coded::<LocationType>("location_type");
    let coordinate = r.coordinate("stop_lat", "stop_lon");
    let timezone = r.scalar("stop_timezone", Timezone::parse);
    let wheelchair_boarding = r.coded("wheelchair_boarding");

    let location_type = location_type?.unwrap_or_default();
    let coordinate = coordinate?;
    if coordinate.is_none() && location_type.requires_coordinate() {
        return Err(r.missing("stop_lat"));
    }

    Ok(Stop {
        id: id?,
        code: r.text("stop_code"),
        name: r.text("stop_name"),
        desc: r.text("stop_desc"),
        coordinate,
        zone_id: r.text("zone_id"),
        url: r.text("stop_url"),
        location_type,
        parent_station: r.text("parent_station"),
        timezone: timezone?,
        wheelchair_boarding: wheelchair_boarding?.unwrap_or_default(),
        platform_code: r.text("platform_code"),
    })
}

fn parse_route(r: &mut RowReader<'_>) -> Result<Route, Rejected> {
    let id = r.required("route_id");
    let route_type = r.required_coded("route_type");
    let color = r.scalar("route_color", Color::parse);
    let text_color = r.scalar("route_text_color", Color::parse);
    let sort_order = r.number("route_sort_order");

    let short_name = r.text("route_short_name");
    let long_name = r.text("route_long_name");
    if short_name.is_none() && long_name.is_none() {
        return Err(r.missing("route_short_name"));
    }

    Ok(Route {
        id: id?,
        agency_id: r.text("agency_id"),
        short_name,
        long_name,
        desc: r.text("route_desc"),
        route_type: route_type?,
        url: r.text("route_url"),
        color: color?.unwrap_or(Color::WHITE),
        text_color: text_color?.unwrap_or(Color::BLACK),
        sort_order: sort_order?,
    })
}

fn parse_trip(r: &mut RowReader<'_>) -> Result<Trip, Rejected> {
    let id = r.required("trip_id");
    let route_id = r.required("route_id");
    let service_id = r.required("service_id");
    let direction_id = r.coded("direction_id");
    let wheelchair_accessible = r.coded("wheelchair_accessible");
    let bikes_allowed = r.coded("bikes_allowed");

    Ok(Trip {
        id: id?,
        route_id: route_id?,
        service_id: service_id?,
        headsign: r.text("trip_headsign"),
        short_name: r.text("trip_short_name"),
        direction_id: direction_id?,
        block_id: r.text("block_id"),
        shape_id: r.text("shape_id"),
        wheelchair_accessible: wheelchair_accessible?.unwrap_or_default(),
        bikes_allowed: bikes_allowed?.unwrap_or_default(),
    })
}

fn parse_stop_time(r: &mut RowReader<'_>) -> Result<StopTime, Rejected> {
    let trip_id = r.required("trip_id");
    let stop_id = r.required("stop_id");
    let stop_sequence = r.required_number("stop_sequence");
    let arrival_time = r.scalar("arrival_time", ServiceTime::parse);
    let departure_time = r.scalar("departure_time", ServiceTime::parse);
    let pickup_type = r.coded("pickup_type");
    let drop_off_type = r.coded("drop_off_type");
    let shape_dist_traveled = r.distance("shape_dist_traveled");
    let timepoint = r.coded("timepoint");

    let (arrival_time, departure_time) = (arrival_time?, departure_time?);
    if let (Some(arrival), Some(departure)) = (arrival_time, departure_time) {
        if departure < arrival {
            return Err(r.reject(ViolationKind::OrderViolation {
                column: "departure_time",
                value: departure.to_string(),
                reason: "departure precedes arrival",
            }));
        }
    }

    Ok(StopTime {
        trip_id: trip_id?,
        arrival_time,
        departure_time,
        stop_id: stop_id?,
        stop_sequence: stop_sequence?,
        stop_headsign: r.text("stop_headsign"),
        pickup_type: pickup_type?.unwrap_or_default(),
        drop_off_type: drop_off_type?.unwrap_or_default(),
        shape_dist_traveled: shape_dist_traveled?,
        timepoint: timepoint?.unwrap_or_default(),
    })
}

fn parse_calendar(r: &mut RowReader<'_>) -> Result<Calendar, Rejected> {
    let service_id = r.required("service_id");
    let days = [
        r.flag("monday"),
        r.flag("tuesday"),
        r.flag("wednesday"),
        r.flag("thursday"),
        r.flag("friday"),
        r.flag("saturday"),
        r.flag("sunday"),
    ];
    let start_date = r.required_scalar("start_date", ServiceDate::parse);
    let end_date = r.required_scalar("end_date", ServiceDate::parse);

    let (start_date, end_date) = (start_date?, end_date?);
    if start_date > end_date {
        return Err(r.reject(ViolationKind::DateRangeViolation {
            start: start_date,
            end: end_date,
        }));
    }

    let [monday, tuesday, wednesday, thursday, friday, saturday, sunday] = days;
    Ok(Calendar {
        service_id: service_id?,
        monday: monday?,
        tuesday: tuesday?,
        wednesday: wednesday?,
        thursday: thursday?,
        friday: friday?,
        saturday: saturday?,
        sunday: sunday?,
        start_date,
        end_date,
    })
}

fn parse_calendar_date(r: &mut RowReader<'_>) -> Result<CalendarDate, Rejected> {
    let service_id = r.required("service_id");
    let date = r.required_scalar("date", ServiceDate::parse);
    let exception_type = r.required_coded("exception_type");

    Ok(CalendarDate {
        service_id: service_id?,
        date: date?,
        exception_type: exception_type?,
    })
}

fn parse_shape_point(r: &mut RowReader<'_>) -> Result<ShapePoint, Rejected> {
    let shape_id = r.required("shape_id");
    let coordinate = r.coordinate("shape_pt_lat", "shape_pt_lon");
    let sequence = r.required_number("shape_pt_sequence");
    let dist_traveled = r.distance("shape_dist_traveled");

    Ok(ShapePoint {
        shape_id: shape_id?,
        coordinate: coordinate?.ok_or_else(|| r.missing("shape_pt_lat"))?,
        sequence: sequence?,
        dist_traveled: dist_traveled?,
    })
}
