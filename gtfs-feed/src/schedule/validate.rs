//! Cross-table checks run after every table has been parsed.

use std::collections::HashSet;

use super::enums::LocationType;
use super::load::Staged;
use super::report::{RowRef, Violation, ViolationKind};
use super::rows::TableName;
use crate::domain::ServiceDate;

/// Check references and orderings, appending to `violations`.
pub(super) fn check(staged: &Staged, violations: &mut Vec<Violation>) {
    let mut out = Checker { violations };
    out.stops(staged);
    out.routes(staged);
    out.trips(staged);
    out.stop_times(staged);
    out.calendar_dates(staged);
    out.shapes(staged);
}

struct Checker<'v> {
    violations: &'v mut Vec<Violation>,
}

impl Checker<'_> {
    fn report(&mut self, table: TableName, row: &RowRef, kind: ViolationKind) {
        self.violations.push(Violation {
            table,
            row: row.clone(),
            kind,
        });
    }

    fn dangling(
        &mut self,
        table: TableName,
        row: &RowRef,
        column: &'static str,
        target: TableName,
        id: &str,
    ) {
        self.report(
            table,
            row,
            ViolationKind::DanglingReference {
                column,
                target,
                id: id.to_string(),
            },
        );
    }

    /// Parent stations may appear anywhere in the table, so this runs only
    /// once every stop is registered.
    fn stops(&mut self, staged: &Staged) {
        for entry in &staged.stops.entries {
            let stop = &entry.record;
            let kind = stop.location_type;

            let Some(parent_id) = stop.parent_station.as_deref() else {
                if kind.requires_parent() {
                    self.report(
                        TableName::Stops,
                        &entry.row,
                        ViolationKind::MissingColumn {
                            column: "parent_station",
                        },
                    );
                }
                continue;
            };

            if kind == LocationType::Station {
                self.invalid_parent(&entry.row, parent_id, "cannot parent a station");
                continue;
            }

            let Some(parent) = staged.stops.get(parent_id) else {
                if !staged.stops.resolves(parent_id) {
                    self.dangling(
                        TableName::Stops,
                        &entry.row,
                        "parent_station",
                        TableName::Stops,
                        parent_id,
                    );
                }
                continue;
            };

            let expected = match kind {
                LocationType::BoardingArea => LocationType::Stop,
                LocationType::Unrecognized(_) => continue,
                _ => LocationType::Station,
            };
            if parent.location_type != expected {
                let reason = match expected {
                    LocationType::Stop => "is not a platform",
                    _ => "is not a station",
                };
                self.invalid_parent(&entry.row, parent_id, reason);
            }
        }
    }

    fn invalid_parent(&mut self, row: &RowRef, parent: &str, reason: &'static str) {
        self.report(
            TableName::Stops,
            row,
            ViolationKind::InvalidParent {
                parent: parent.to_string(),
                reason,
            },
        );
    }

    fn routes(&mut self, staged: &Staged) {
        for entry in &staged.routes.entries {
            match entry.record.agency_id.as_deref() {
                Some(agency_id) => {
                    if !staged.agencies.resolves(agency_id) {
                        self.dangling(
                            TableName::Routes,
                            &entry.row,
                            "agency_id",
                            TableName::Agency,
                            agency_id,
                        );
                    }
                }
                None if staged.agency_rows > 1 => self.report(
                    TableName::Routes,
                    &entry.row,
                    ViolationKind::MissingColumn {
                        column: "agency_id",
                    },
                ),
                None => {}
            }
        }
    }

    fn trips(&mut self, staged: &Staged) {
        for entry in &staged.trips.entries {
            let trip = &entry.record;

            if !staged.routes.resolves(&trip.route_id) {
                self.dangling(
                    TableName::Trips,
                    &entry.row,
                    "route_id",
                    TableName::Routes,
                    &trip.route_id,
                );
            }

            if !staged.calendars.resolves(&trip.service_id)
                && !staged.calendar_dates.resolves(&trip.service_id)
            {
                self.dangling(
                    TableName::Trips,
                    &entry.row,
                    "service_id",
                    TableName::Calendar,
                    &trip.service_id,
                );
            }

            if let Some(shape_id) = trip.shape_id.as_deref() {
                if staged.has_shapes && !staged.shapes.resolves(shape_id) {
                    self.dangling(
                        TableName::Trips,
                        &entry.row,
                        "shape_id",
                        TableName::Shapes,
                        shape_id,
                    );
                }
            }
        }
    }

    /// Rows need not arrive sorted, but no two may share a sequence number
    /// within one trip.
    fn stop_times(&mut self, staged: &Staged) {
        let mut seen: HashSet<(&str, u32)> = HashSet::new();

        for entry in &staged.stop_times.entries {
            let st = &entry.record;

            if !staged.trips.resolves(&st.trip_id) {
                self.dangling(
                    TableName::StopTimes,
                    &entry.row,
                    "trip_id",
                    TableName::Trips,
                    &st.trip_id,
                );
            }
            if !staged.stops.resolves(&st.stop_id) {
                self.dangling(
                    TableName::StopTimes,
                    &entry.row,
                    "stop_id",
                    TableName::Stops,
                    &st.stop_id,
                );
            }

            if !seen.insert((st.trip_id.as_str(), st.stop_sequence)) {
                self.report(
                    TableName::StopTimes,
                    &entry.row,
                    ViolationKind::OrderViolation {
                        column: "stop_sequence",
                        value: st.stop_sequence.to_string(),
                        reason: "repeats an earlier sequence in the same trip",
                    },
                );
            }
        }
    }

    fn calendar_dates(&mut self, staged: &Staged) {
        let mut seen: HashSet<(&str, ServiceDate)> = HashSet::new();

        for entry in &staged.calendar_dates.entries {
            let cd = &entry.record;
            if !seen.insert((cd.service_id.as_str(), cd.date)) {
                self.report(
                    TableName::CalendarDates,
                    &entry.row,
                    ViolationKind::DuplicateId {
                        id: format!("{} {}", cd.service_id, cd.date),
                    },
                );
            }
        }
    }

    fn shapes(&mut self, staged: &Staged) {
        let mut seen: HashSet<(&str, u32)> = HashSet::new();

        for entry in &staged.shapes.entries {
            let point = &entry.record;
            if !seen.insert((point.shape_id.as_str(), point.sequence)) {
                self.report(
                    TableName::Shapes,
                    &entry.row,
                    ViolationKind::OrderViolation {
                        column: "shape_pt_sequence",
                        value: point.sequence.to_string(),
                        reason: "repeats an earlier sequence in the same shape",
                    },
                );
            }
        }
    }
}
