//! The validated static feed and its query methods.

use std::collections::{BTreeSet, HashMap};

use super::enums::ExceptionType;
use super::load::{Keyed, Staged};
use super::records::{Agency, Calendar, CalendarDate, Route, ShapePoint, Stop, StopTime, Trip};
use crate::domain::ServiceDate;

/// Records in input order with an id index into them.
#[derive(Debug, Clone)]
struct Table<T> {
    rows: Vec<T>,
    index: HashMap<String, usize>,
}

impl<T> Table<T> {
    fn from_keyed(keyed: Keyed<T>) -> Self {
        Self {
            rows: keyed.entries.into_iter().map(|e| e.record).collect(),
            index: keyed.index,
        }
    }

    fn get(&self, id: &str) -> Option<&T> {
        self.index.get(id).map(|&i| &self.rows[i])
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }
}

/// A referentially consistent static feed.
///
/// Only [`load_feed`](super::load_feed) builds one, and only from a table set
/// without violations. Every id held by a record resolves within the feed.
#[derive(Debug, Clone)]
pub struct Feed {
    agencies: Table<Agency>,
    stops: Table<Stop>,
    routes: Table<Route>,
    trips: Table<Trip>,
    calendars: Table<Calendar>,
    calendar_dates: Vec<CalendarDate>,
    stop_times: Vec<StopTime>,
    shape_points: Vec<ShapePoint>,

    /// Route position -> trip positions, in input order.
    trips_by_route: HashMap<usize, Vec<usize>>,
    /// Service id -> trip positions, in input order.
    trips_by_service: HashMap<String, Vec<usize>>,
    /// Trip position -> range of `stop_times`, which are sorted by
    /// (trip, sequence).
    stop_times_by_trip: HashMap<usize, (usize, usize)>,
    /// Shape id -> range of `shape_points`, sorted likewise.
    points_by_shape: HashMap<String, (usize, usize)>,
    /// Parent stop position -> child positions, in input order.
    children: HashMap<usize, Vec<usize>>,
    exceptions: HashMap<String, HashMap<ServiceDate, ExceptionType>>,
    /// Every service id named by a calendar or calendar date.
    services: BTreeSet<String>,
}

impl Feed {
    pub(super) fn from_staged(staged: Staged) -> Self {
        let agencies = Table::from_keyed(staged.agencies);
        let stops = Table::from_keyed(staged.stops);
        let routes = Table::from_keyed(staged.routes);
        let trips = Table::from_keyed(staged.trips);
        let calendars = Table::from_keyed(staged.calendars);
        let calendar_dates: Vec<CalendarDate> = staged
            .calendar_dates
            .entries
            .into_iter()
            .map(|e| e.record)
            .collect();

        let mut trips_by_route: HashMap<usize, Vec<usize>> = HashMap::new();
        let mut trips_by_service: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, trip) in trips.rows.iter().enumerate() {
            if let Some(route) = routes.position(&trip.route_id) {
                trips_by_route.entry(route).or_default().push(i);
            }
            trips_by_service
                .entry(trip.service_id.clone())
                .or_default()
                .push(i);
        }

        let mut stop_times: Vec<(usize, StopTime)> = staged
            .stop_times
            .entries
            .into_iter()
            .filter_map(|e| trips.position(&e.record.trip_id).map(|t| (t, e.record)))
            .collect();
        stop_times.sort_by_key(|(trip, st)| (*trip, st.stop_sequence));
        let stop_times_by_trip = ranges(stop_times.iter().map(|(trip, _)| *trip));
        let stop_times: Vec<StopTime> = stop_times.into_iter().map(|(_, st)| st).collect();

        let mut shape_points: Vec<ShapePoint> =
            staged.shapes.entries.into_iter().map(|e| e.record).collect();
        shape_points.sort_by(|a, b| {
            a.shape_id
                .cmp(&b.shape_id)
                .then(a.sequence.cmp(&b.sequence))
        });
        let points_by_shape = ranges(shape_points.iter().map(|p| p.shape_id.clone()));

        let mut children: HashMap<usize, Vec<usize>> = HashMap::new();
        for (i, stop) in stops.rows.iter().enumerate() {
            if let Some(parent) = stop.parent_station.as_deref().and_then(|p| stops.position(p)) {
                children.entry(parent).or_default().push(i);
            }
        }

        let mut exceptions: HashMap<String, HashMap<ServiceDate, ExceptionType>> = HashMap::new();
        for cd in &calendar_dates {
            exceptions
                .entry(cd.service_id.clone())
                .or_default()
                .insert(cd.date, cd.exception_type);
        }

        let services = calendars
            .rows
            .iter()
            .map(|c| c.service_id.clone())
            .chain(calendar_dates.iter().map(|cd| cd.service_id.clone()))
            .collect();

        Self {
            agencies,
            stops,
            routes,
            trips,
            calendars,
            calendar_dates,
            stop_times,
            shape_points,
            trips_by_route,
            trips_by_service,
            stop_times_by_trip,
            points_by_shape,
            children,
            exceptions,
            services,
        }
    }

    pub fn agencies(&self) -> &[Agency] {
        &self.agencies.rows
    }

    pub fn agency(&self, id: &str) -> Option<&Agency> {
        self.agencies.get(id)
    }

    /// The agency operating a route. Routes without an agency id belong to
    /// the feed's only agency.
    pub fn agency_of(&self, route: &Route) -> Option<&Agency> {
        match route.agency_id.as_deref() {
            Some(id) => self.agencies.get(id),
            None => match self.agencies.rows.as_slice() {
                [only] => Some(only),
                _ => None,
            },
        }
    }

    pub fn stops(&self) -> &[Stop] {
        &self.stops.rows
    }

    pub fn stop(&self, id: &str) -> Option<&Stop> {
        self.stops.get(id)
    }

    pub fn parent_of(&self, stop_id: &str) -> Option<&Stop> {
        self.stop(stop_id)
            .and_then(|s| s.parent_station.as_deref())
            .and_then(|p| self.stops.get(p))
    }

    /// Stops naming `stop_id` as their parent station, in input order.
    pub fn children_of(&self, stop_id: &str) -> impl Iterator<Item = &Stop> + Clone {
        self.stops
            .position(stop_id)
            .and_then(|i| self.children.get(&i))
            .into_iter()
            .flatten()
            .map(|&i| &self.stops.rows[i])
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes.rows
    }

    pub fn route(&self, id: &str) -> Option<&Route> {
        self.routes.get(id)
    }

    pub fn trips(&self) -> &[Trip] {
        &self.trips.rows
    }

    pub fn trip(&self, id: &str) -> Option<&Trip> {
        self.trips.get(id)
    }

    pub fn trips_for_route(&self, route_id: &str) -> impl Iterator<Item = &Trip> + Clone {
        self.routes
            .position(route_id)
            .and_then(|i| self.trips_by_route.get(&i))
            .into_iter()
            .flatten()
            .map(|&i| &self.trips.rows[i])
    }

    pub fn trips_for_service(&self, service_id: &str) -> impl Iterator<Item = &Trip> + Clone {
        self.trips_by_service
            .get(service_id)
            .into_iter()
            .flatten()
            .map(|&i| &self.trips.rows[i])
    }

    /// Stop times of a trip in stop sequence order.
    pub fn stop_times_for_trip(&self, trip_id: &str) -> &[StopTime] {
        let range = self
            .trips
            .position(trip_id)
            .and_then(|i| self.stop_times_by_trip.get(&i));
        match range {
            Some(&(start, end)) => &self.stop_times[start..end],
            None => &[],
        }
    }

    /// Points of a shape in sequence order.
    pub fn shape_points(&self, shape_id: &str) -> &[ShapePoint] {
        match self.points_by_shape.get(shape_id) {
            Some(&(start, end)) => &self.shape_points[start..end],
            None => &[],
        }
    }

    pub fn calendars(&self) -> &[Calendar] {
        &self.calendars.rows
    }

    pub fn calendar(&self, service_id: &str) -> Option<&Calendar> {
        self.calendars.get(service_id)
    }

    pub fn calendar_dates(&self) -> &[CalendarDate] {
        &self.calendar_dates
    }

    /// Whether a service runs on a date.
    ///
    /// A calendar date exception takes precedence. Otherwise the weekly
    /// pattern decides, within its start and end dates.
    pub fn is_service_active(&self, service_id: &str, date: ServiceDate) -> bool {
        let exception = self
            .exceptions
            .get(service_id)
            .and_then(|dates| dates.get(&date));
        match exception {
            Some(ExceptionType::Added) => true,
            Some(ExceptionType::Removed) => false,
            // Preserved unknown codes neither add nor remove service
            Some(ExceptionType::Unrecognized(_)) | None => self
                .calendars
                .get(service_id)
                .is_some_and(|c| c.covers(date)),
        }
    }

    /// Service ids running on a date, in ascending order.
    pub fn active_services_on(&self, date: ServiceDate) -> impl Iterator<Item = &str> + Clone {
        self.services
            .iter()
            .map(String::as_str)
            .filter(move |s| self.is_service_active(s, date))
    }
}

/// Map each run of equal consecutive keys to its `start..end` range.
fn ranges<K: Eq + std::hash::Hash>(keys: impl Iterator<Item = K>) -> HashMap<K, (usize, usize)> {
    let mut out: HashMap<K, (usize, usize)> = HashMap::new();
    for (i, key) in keys.enumerate() {
        out.entry(key)
            .and_modify(|range| range.1 = i + 1)
            .or_insert((i, i + 1));
    }
    out
}
