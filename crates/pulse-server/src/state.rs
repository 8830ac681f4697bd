//! Shared state for the reporter.
//!
//! The server owns one activity source, the roster it was started with,
//! and the most recent snapshot. A snapshot is only ever replaced
//! wholesale after a check completes, so readers never observe a
//! half-written result.

use chrono::Duration;
use pulse_core::{ActivitySource, Identity, Snapshot};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

#[derive(Clone)]
pub struct AppState {
    /// Where activity counts come from.
    pub source: Arc<dyn ActivitySource>,
    /// Identities to check, in configured order.
    pub roster: Arc<Vec<Identity>>,
    /// Trailing window length for each check.
    pub lookback: Duration,
    /// Most recent snapshot, if a check has completed.
    pub latest: Arc<RwLock<Option<Snapshot>>>,
    /// Held for the duration of a check; `try_lock` failure means one
    /// is already in flight.
    pub check_guard: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(source: Arc<dyn ActivitySource>, roster: Vec<Identity>, lookback: Duration) -> Self {
        AppState {
            source,
            roster: Arc::new(roster),
            lookback,
            latest: Arc::new(RwLock::new(None)),
            check_guard: Arc::new(Mutex::new(())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
