//! Static load configuration.

use serde::Deserialize;

/// How to treat an enum column holding a code the loader does not know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownEnumPolicy {
    /// Report an unknown-enum-value violation.
    #[default]
    Reject,
    /// Keep the raw code in the enum's unrecognized case.
    Preserve,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoadConfig {
    pub unknown_enums: UnknownEnumPolicy,

    /// Tables longer than this are reported and not loaded.
    pub max_rows_per_table: Option<usize>,
}

impl LoadConfig {
    pub fn new(unknown_enums: UnknownEnumPolicy, max_rows_per_table: Option<usize>) -> Self {
        Self {
            unknown_enums,
            max_rows_per_table,
        }
    }
}
