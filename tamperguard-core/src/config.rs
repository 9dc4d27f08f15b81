use serde::{Deserialize, Serialize};

/// Default limit for parent-chain walks.
pub const DEFAULT_MAX_PATH_DEPTH: usize = 256;

/// How a recomputed fingerprint map is compared with the baseline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonMode {
    #[default]
    /// Compare the sums of all fingerprints. Offsetting changes in two fields
    /// cancel out, and a renamed field with an unchanged value goes unnoticed.
    Sum,
    /// Compare key sets and every value individually.
    PerField,
}

/// Configuration for a [`TamperWatcher`](crate::TamperWatcher).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatcherConfig {
    /// Baseline comparison strategy.
    pub comparison: ComparisonMode,
    /// Maximum number of ancestors walked when resolving a structural path.
    pub max_path_depth: usize,
    /// Initial value of the persisted debug panel toggle for new watchers.
    pub show_debug_panel: bool,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            comparison: ComparisonMode::Sum,
            max_path_depth: DEFAULT_MAX_PATH_DEPTH,
            show_debug_panel: true,
        }
    }
}
