//! Realtime decode configuration.

use serde::Deserialize;

use crate::wire::DEFAULT_MAX_DEPTH;

/// What to do when an optional nested structure fails to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubstructurePolicy {
    /// Treat the structure as absent and say nothing.
    Drop,
    /// Treat the structure as absent and record a warning.
    #[default]
    Report,
    /// Abort the whole decode.
    Reject,
}

/// Parameters for decoding a realtime buffer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DecodeConfig {
    /// Refuse buffers longer than this many bytes.
    pub max_buffer_len: Option<usize>,

    /// Maximum depth of nested messages and skipped groups.
    pub max_nesting_depth: usize,

    pub substructure_policy: SubstructurePolicy,
}

impl DecodeConfig {
    pub fn new(
        max_buffer_len: Option<usize>,
        max_nesting_depth: usize,
        substructure_policy: SubstructurePolicy,
    ) -> Self {
        Self {
            max_buffer_len,
            max_nesting_depth,
            substructure_policy,
        }
    }

    /// Default limits with a different substructure policy.
    pub fn with_policy(substructure_policy: SubstructurePolicy) -> Self {
        Self {
            substructure_policy,
            ..Self::default()
        }
    }
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            max_buffer_len: None,
            max_nesting_depth: DEFAULT_MAX_DEPTH,
            substructure_policy: SubstructurePolicy::Report,
        }
    }
}
