//! Snapshot endpoints: read the latest capture and trigger a new one.

use axum::extract::State;
use axum::Json;
use pulse_core::{check_activity, Snapshot};
use serde_json::json;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/snapshot
///
/// Returns the most recent snapshot, or 404 if no check has completed
/// since the server started.
pub async fn get_snapshot(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let latest = app.latest.read().await;
    match latest.as_ref() {
        Some(snapshot) => Ok(Json(render(snapshot))),
        None => Err(AppError::not_found("no snapshot captured yet")),
    }
}

/// POST /api/check
///
/// Runs a fresh check over the configured roster and stores the result.
/// Only one check runs at a time; a second trigger while one is in
/// flight gets 409 and the stored snapshot is left alone. A failed
/// check also leaves the previous snapshot in place.
pub async fn run_check(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let Ok(_guard) = app.check_guard.try_lock() else {
        return Err(AppError::conflict("a check is already running"));
    };

    tracing::info!(roster = app.roster.len(), "running activity check");
    let snapshot = check_activity(app.source.as_ref(), &app.roster, app.lookback).await?;

    let rendered = render(&snapshot);
    *app.latest.write().await = Some(snapshot);
    Ok(Json(rendered))
}

/// Wire shape for a snapshot. `activity` is derived from the record so
/// clients do not have to re-implement the classification.
pub(crate) fn render(snapshot: &Snapshot) -> serde_json::Value {
    let records: Vec<serde_json::Value> = snapshot
        .records
        .iter()
        .map(|record| {
            json!({
                "identity": record.identity,
                "commit_count": record.commit_count,
                "issue_count": record.issue_count,
                "active": record.active,
                "failed": record.failed,
                "activity": record.activity(),
            })
        })
        .collect();

    json!({
        "captured_at": snapshot.captured_at,
        "partial": snapshot.partial,
        "status": snapshot.status(),
        "records": records,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
