//! Tokenized static tables.

use std::collections::HashMap;
use std::fmt;

/// The static tables the loader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TableName {
    Agency,
    Stops,
    Routes,
    Trips,
    StopTimes,
    Calendar,
    CalendarDates,
    Shapes,
}

impl TableName {
    pub const ALL: [TableName; 8] = [
        TableName::Agency,
        TableName::Stops,
        TableName::Routes,
        TableName::Trips,
        TableName::StopTimes,
        TableName::Calendar,
        TableName::CalendarDates,
        TableName::Shapes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TableName::Agency => "agency",
            TableName::Stops => "stops",
            TableName::Routes => "routes",
            TableName::Trips => "trips",
            TableName::StopTimes => "stop_times",
            TableName::Calendar => "calendar",
            TableName::CalendarDates => "calendar_dates",
            TableName::Shapes => "shapes",
        }
    }

    /// File name inside a feed bundle, e.g. `stop_times.txt`.
    pub fn file_name(&self) -> String {
        format!("{}.txt", self.as_str())
    }

    /// Tables a feed cannot do without. A feed also needs at least one of
    /// `calendar` and `calendar_dates`.
    pub fn is_required(&self) -> bool {
        matches!(
            self,
            TableName::Agency
                | TableName::Stops
                | TableName::Routes
                | TableName::Trips
                | TableName::StopTimes
        )
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One table row: column name to raw text.
///
/// Empty and whitespace-only values read as absent, so a column that is
/// present in the header but blank in this row behaves like a missing one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    values: HashMap<String, String>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.values.insert(column.into(), value.into());
    }

    /// The trimmed value of a column, or `None` if it is missing or blank.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values
            .get(column)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Rows for each supplied table, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableSet {
    tables: HashMap<TableName, Vec<Row>>,
}

impl TableSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, table: TableName, rows: Vec<Row>) -> Self {
        self.insert(table, rows);
        self
    }

    /// Supply a table, replacing any rows given for it before.
    pub fn insert(&mut self, table: TableName, rows: Vec<Row>) {
        self.tables.insert(table, rows);
    }

    /// Rows of a table, or `None` if the table was not supplied at all.
    ///
    /// A supplied table with zero rows is `Some(&[])`.
    pub fn get(&self, table: TableName) -> Option<&[Row]> {
        self.tables.get(&table).map(Vec::as_slice)
    }

    pub fn contains(&self, table: TableName) -> bool {
        self.tables.contains_key(&table)
    }

    /// Supplied tables in declaration order.
    pub fn tables(&self) -> impl Iterator<Item = TableName> + '_ {
        TableName::ALL.into_iter().filter(|t| self.contains(*t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_are_absent() {
        let row: Row = [("stop_id", " s1 "), ("stop_code", ""), ("stop_desc", "   ")]
            .into_iter()
            .collect();
        assert_eq!(row.get("stop_id"), Some("s1"));
        assert_eq!(row.get("stop_code"), None);
        assert_eq!(row.get("stop_desc"), None);
        assert_eq!(row.get("stop_name"), None);
        assert_eq!(row.columns().count(), 3);
    }

    #[test]
    fn table_names() {
        assert_eq!(TableName::StopTimes.as_str(), "stop_times");
        assert_eq!(TableName::CalendarDates.file_name(), "calendar_dates.txt");
        assert!(TableName::Trips.is_required());
        assert!(!TableName::Calendar.is_required());
        assert!(!TableName::Shapes.is_required());
    }

    #[test]
    fn table_set_distinguishes_empty_from_missing() {
        let set = TableSet::new()
            .with(TableName::Shapes, Vec::new())
            .with(TableName::Agency, vec![Row::new()]);
        assert_eq!(set.get(TableName::Shapes), Some(&[][..]));
        assert_eq!(set.get(TableName::Stops), None);
        assert_eq!(set.get(TableName::Agency).map(<[Row]>::len), Some(1));
        assert_eq!(
            set.tables().collect::<Vec<_>>(),
            vec![TableName::Agency, TableName::Shapes]
        );
    }
}
