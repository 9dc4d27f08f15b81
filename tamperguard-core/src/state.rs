//! Persisted watcher state and per-field drift reports.
//!
//! [`PersistedState`] is everything a watcher needs to survive a save and
//! reload of the hosting document. Fingerprint maps are kept in their
//! serialized string form so a stored document stays readable by older
//! tooling.

use serde::{Deserialize, Serialize};
use tamperguard_types::LockTimestamp;

use crate::fingerprint::FingerprintMap;

/// Serializable watcher state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    /// Whether a baseline is currently locked in.
    pub locked: bool,
    /// When the current lock was taken.
    pub lock_timestamp: Option<LockTimestamp>,
    /// Serialized baseline map.
    pub baseline: String,
    /// Serialized map from the most recent check.
    pub current: String,
    /// Identity token of the target the baseline was taken from.
    pub target_token: String,
    /// Whether the host shows the per-field debug panel.
    pub show_debug_panel: bool,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            locked: false,
            lock_timestamp: None,
            baseline: String::new(),
            current: String::new(),
            target_token: String::new(),
            show_debug_panel: true,
        }
    }
}

/// Outcome for a single field in a [`FieldReport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldStatus {
    /// Present in both maps with the same fingerprint.
    Ok,
    /// Present in both maps with different fingerprints.
    Changed,
    /// In the baseline but not in the current map.
    Missing,
    /// In the current map but not in the baseline.
    Added,
}

/// Baseline and current fingerprint of one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldReport {
    pub name: String,
    pub baseline: Option<i32>,
    pub current: Option<i32>,
    pub status: FieldStatus,
}

/// Compares two maps field by field.
///
/// Without a current map every baseline field reports [`FieldStatus::Ok`]
/// with no current value. Baseline fields come first in name order, followed
/// by fields only the current map has.
pub fn compare_fields(
    baseline: &FingerprintMap,
    current: Option<&FingerprintMap>,
) -> Vec<FieldReport> {
    let mut reports: Vec<FieldReport> = baseline
        .iter()
        .map(|(name, base)| {
            let now = current.and_then(|c| c.get(name));
            let status = match (current, now) {
                (None, _) => FieldStatus::Ok,
                (Some(_), None) => FieldStatus::Missing,
                (Some(_), Some(v)) if v == base => FieldStatus::Ok,
                (Some(_), Some(_)) => FieldStatus::Changed,
            };
            FieldReport {
                name: name.to_string(),
                baseline: Some(base),
                current: now,
                status,
            }
        })
        .collect();

    if let Some(current) = current {
        reports.extend(
            current
                .iter()
                .filter(|(name, _)| !baseline.contains(name))
                .map(|(name, now)| FieldReport {
                    name: name.to_string(),
                    baseline: None,
                    current: Some(now),
                    status: FieldStatus::Added,
                }),
        );
    }
    reports
}

/// Whether any field in `reports` differs from the baseline.
#[must_use]
pub fn has_drift(reports: &[FieldReport]) -> bool {
    reports.iter().any(|r| r.status != FieldStatus::Ok)
}
