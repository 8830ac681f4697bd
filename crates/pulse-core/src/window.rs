use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Half-open time interval `[since, until)` bounding both source queries.
///
/// The checker computes one window per invocation and hands the same
/// value to every query task, so all identities are judged against an
/// identical interval no matter when their task actually runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityWindow {
    pub since: DateTime<Utc>,
    pub until: DateTime<Utc>,
}

impl ActivityWindow {
    /// Window trailing `lookback` and ending at `now`.
    ///
    /// Pure: the same `now` always yields a structurally equal window.
    pub fn trailing(lookback: Duration, now: DateTime<Utc>) -> Self {
        ActivityWindow {
            since: now - lookback,
            until: now,
        }
    }

    /// True if `t` lies inside the window (`since` inclusive, `until`
    /// exclusive).
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        self.since <= t && t < self.until
    }

    pub fn duration(&self) -> Duration {
        self.until - self.since
    }
}
