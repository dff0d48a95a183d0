//! Aggregated validation results for a static feed.

use std::fmt;

use super::rows::TableName;
use crate::domain::{MalformedScalar, ServiceDate};

/// Identifies the row a violation was found in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RowRef {
    /// 1-based position within the table; 0 for table-level problems.
    pub index: usize,
    /// The row's own id, when it could be read.
    pub id: Option<String>,
}

impl RowRef {
    pub fn new(index: usize, id: Option<String>) -> Self {
        Self { index, id }
    }

    /// Reference to the table as a whole rather than one row.
    pub fn table() -> Self {
        Self {
            index: 0,
            id: None,
        }
    }
}

impl fmt::Display for RowRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.index, &self.id) {
            (0, _) => f.write_str("table"),
            (index, Some(id)) => write!(f, "row {index} ({id})"),
            (index, None) => write!(f, "row {index}"),
        }
    }
}

/// What was wrong with a row.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ViolationKind {
    #[error("required table is missing")]
    MissingTable,

    #[error("required table has no rows")]
    EmptyTable,

    #[error("missing required column {column}")]
    MissingColumn { column: &'static str },

    #[error("{column}: {error}")]
    MalformedScalar {
        column: &'static str,
        error: MalformedScalar,
    },

    #[error("{column}: invalid number {value:?}")]
    InvalidNumber { column: &'static str, value: String },

    #[error("{column}: unknown value {value:?}")]
    UnknownEnumValue { column: &'static str, value: String },

    /// The id is already taken by an earlier row, which stays authoritative.
    #[error("duplicate id {id:?}")]
    DuplicateId { id: String },

    #[error("{column} {id:?} does not exist in {target}")]
    DanglingReference {
        column: &'static str,
        target: TableName,
        id: String,
    },

    #[error("{column} {value:?} is out of order: {reason}")]
    OrderViolation {
        column: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("start date {start} is after end date {end}")]
    DateRangeViolation {
        start: ServiceDate,
        end: ServiceDate,
    },

    #[error("parent station {parent:?} {reason}")]
    InvalidParent {
        parent: String,
        reason: &'static str,
    },

    #[error("table has more than {limit} rows")]
    RowLimitExceeded { limit: usize },
}

/// One problem found while loading.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub table: TableName,
    pub row: RowRef,
    pub kind: ViolationKind,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.table, self.row, self.kind)
    }
}

/// Every violation found in a table set. Never empty when returned as an error.
#[derive(Debug, Clone, Default, PartialEq, thiserror::Error)]
#[error("feed has {} violation(s)", .violations.len())]
pub struct ValidationReport {
    violations: Vec<Violation>,
}

impl ValidationReport {
    pub(crate) fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Violations in the order they were found: table by table, then row by row.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn for_table(&self, table: TableName) -> impl Iterator<Item = &Violation> + Clone {
        self.violations.iter().filter(move |v| v.table == table)
    }

    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }
}

impl<'a> IntoIterator for &'a ValidationReport {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn violation_display() {
        let v = Violation {
            table: TableName::StopTimes,
            row: RowRef::new(4, None),
            kind: ViolationKind::DanglingReference {
                column: "trip_id",
                target: TableName::Trips,
                id: "t9".to_string(),
            },
        };
        assert_eq!(
            v.to_string(),
            "stop_times row 4: trip_id \"t9\" does not exist in trips"
        );

        let v = Violation {
            table: TableName::Agency,
            row: RowRef::new(2, Some("a1".to_string())),
            kind: ViolationKind::DuplicateId {
                id: "a1".to_string(),
            },
        };
        assert_eq!(v.to_string(), "agency row 2 (a1): duplicate id \"a1\"");

        let v = Violation {
            table: TableName::Shapes,
            row: RowRef::table(),
            kind: ViolationKind::RowLimitExceeded { limit: 10 },
        };
        assert_eq!(v.to_string(), "shapes table: table has more than 10 rows");
    }

    #[test]
    fn report_filters_by_table() {
        let report = ValidationReport::new(vec![
            Violation {
                table: TableName::Stops,
                row: RowRef::new(1, None),
                kind: ViolationKind::MissingColumn { column: "stop_id" },
            },
            Violation {
                table: TableName::Routes,
                row: RowRef::table(),
                kind: ViolationKind::MissingTable,
            },
        ]);
        assert_eq!(report.len(), 2);
        assert_eq!(report.to_string(), "feed has 2 violation(s)");
        assert_eq!(report.for_table(TableName::Routes).count(), 1);
        assert_eq!(report.for_table(TableName::Trips).count(), 0);
        assert_eq!((&report).into_iter().count(), 2);
    }
}
