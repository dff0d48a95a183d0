//! Combined configuration for both pipelines.
//!
//! ```json
//! {
//!   "realtime": { "max_buffer_len": 1048576, "substructure_policy": "reject" },
//!   "schedule": { "unknown_enums": "preserve", "max_rows_per_table": 1000000 }
//! }
//! ```
//!
//! Every section and key is optional.

use std::fs;
use std::io;
use std::path::Path;

use serde::Deserialize;

use crate::realtime::DecodeConfig;
use crate::schedule::LoadConfig;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] io::Error),

    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub realtime: DecodeConfig,
    pub schedule: LoadConfig,
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_json(&fs::read_to_string(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::realtime::SubstructurePolicy;
    use crate::schedule::UnknownEnumPolicy;

    #[test]
    fn empty_object_is_default() {
        assert_eq!(Config::from_json("{}").unwrap(), Config::default());
    }

    #[test]
    fn sections_are_independent() {
        let config = Config::from_json(
            r#"{"realtime": {"substructure_policy": "drop"}, "schedule": {"unknown_enums": "preserve"}}"#,
        )
        .unwrap();
        assert_eq!(config.realtime.substructure_policy, SubstructurePolicy::Drop);
        assert_eq!(config.realtime.max_nesting_depth, 32);
        assert_eq!(config.schedule.unknown_enums, UnknownEnumPolicy::Preserve);
        assert_eq!(config.schedule.max_rows_per_table, None);
    }

    #[test]
    fn unknown_section_is_rejected() {
        let err = Config::from_json(r#"{"realtme": {}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
        assert!(err.to_string().starts_with("invalid config: "));
    }

    #[test]
    fn from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"schedule": {"max_rows_per_table": 10}}"#).unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.schedule.max_rows_per_table, Some(10));

        let missing = Config::from_file(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(missing, ConfigError::Io(_)));
    }
}
