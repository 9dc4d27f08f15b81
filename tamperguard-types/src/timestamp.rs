//! Lock timestamps.
//!
//! A lock timestamp records when a watcher's baseline was captured. It is
//! persisted as a plain integer (milliseconds since the Unix epoch) so hosts
//! can store it next to the other watcher fields without a custom format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

/// The instant a baseline was locked, in milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LockTimestamp(i64);

impl LockTimestamp {
    /// Creates a timestamp at the current time.
    ///
    /// A system clock set before the Unix epoch yields the epoch itself.
    #[must_use]
    pub fn now() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or_default();
        Self(millis)
    }

    /// Creates a timestamp from persisted ticks.
    #[must_use]
    pub const fn from_ticks(ticks: i64) -> Self {
        Self(ticks)
    }

    /// Returns the persisted tick value.
    #[must_use]
    pub const fn ticks(&self) -> i64 {
        self.0
    }

    /// Converts to a calendar date/time for display.
    pub fn to_datetime(&self) -> crate::Result<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp_millis(self.0)
            .ok_or_else(|| crate::Error::InvalidTimestamp(format!("{} is out of range", self.0)))
    }

    /// Returns true if this lock happened before the other.
    #[must_use]
    pub fn is_before(&self, other: &Self) -> bool {
        self < other
    }
}

impl fmt::Display for LockTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Ok(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S UTC")),
            Err(_) => write!(f, "{} ticks", self.0),
        }
    }
}

impl FromStr for LockTimestamp {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|e| crate::Error::InvalidTimestamp(format!("{s:?}: {e}")))
    }
}
