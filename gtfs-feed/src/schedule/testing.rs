//! Small valid feed used by the schedule tests.

use super::rows::{Row, TableName, TableSet};

/// Rows from a comma-separated header and lines.
pub(crate) fn table(header: &str, lines: &[&str]) -> Vec<Row> {
    let columns: Vec<&str> = header.split(',').collect();
    lines
        .iter()
        .map(|line| columns.iter().copied().zip(line.split(',')).collect())
        .collect()
}

pub(crate) fn agency() -> Vec<Row> {
    table(
        "agency_id,agency_name,agency_url,agency_timezone,agency_lang",
        &["a1,Metro,https://metro.example,Europe/London,en"],
    )
}

/// The platform row comes before its parent station.
pub(crate) fn stops() -> Vec<Row> {
    table(
        "stop_id,stop_name,stop_lat,stop_lon,location_type,parent_station",
        &[
            "p1,Central Platform 1,51.5010,-0.1420,0,st1",
            "st1,Central,51.5007,-0.1419,1,",
            "p2,High Street,51.5100,-0.1300,,",
            "ba1,Platform 1 Front,,,4,p1",
        ],
    )
}

pub(crate) fn routes() -> Vec<Row> {
    table(
        "route_id,agency_id,route_short_name,route_long_name,route_type,route_color",
        &["r1,a1,1,,3,FF0000", "r2,a1,,Night Bus,3,"],
    )
}

pub(crate) fn trips() -> Vec<Row> {
    table(
        "route_id,service_id,trip_id,direction_id,shape_id",
        &["r1,wk,t1,0,sh1", "r1,wk,t2,1,", "r2,hol,t3,,"],
    )
}

/// Sequences of `t1` are deliberately out of row order.
pub(crate) fn stop_times() -> Vec<Row> {
    table(
        "trip_id,arrival_time,departure_time,stop_id,stop_sequence",
        &[
            "t1,08:10:00,08:10:00,p2,2",
            "t1,08:00:00,08:01:00,p1,1",
            "t2,09:00:00,09:00:00,p1,1",
            "t3,24:30:00,24:30:00,p2,1",
        ],
    )
}

pub(crate) fn calendar() -> Vec<Row> {
    table(
        "service_id,monday,tuesday,wednesday,thursday,friday,saturday,sunday,start_date,end_date",
        &["wk,1,1,1,1,1,0,0,20240101,20241231"],
    )
}

pub(crate) fn calendar_dates() -> Vec<Row> {
    table(
        "service_id,date,exception_type",
        &["wk,20240315,2", "hol,20240316,1"],
    )
}

pub(crate) fn shapes() -> Vec<Row> {
    table(
        "shape_id,shape_pt_lat,shape_pt_lon,shape_pt_sequence",
        &["sh1,51.5100,-0.1300,2", "sh1,51.5010,-0.1420,1"],
    )
}

pub(crate) fn tables() -> TableSet {
    TableSet::new()
        .with(TableName::Agency, agency())
        .with(TableName::Stops, stops())
        .with(TableName::Routes, routes())
        .with(TableName::Trips, trips())
        .with(TableName::StopTimes, stop_times())
        .with(TableName::Calendar, calendar())
        .with(TableName::CalendarDates, calendar_dates())
        .with(TableName::Shapes, shapes())
}
