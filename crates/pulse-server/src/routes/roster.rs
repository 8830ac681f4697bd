//! Roster endpoint.

use axum::extract::State;
use axum::Json;
use serde_json::json;

use crate::state::AppState;

/// GET /api/roster
///
/// The identities this server checks, in configured order, plus the
/// window length applied to each check.
pub async fn get_roster(State(app): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "roster": app.roster.as_ref(),
        "window_hours": app.lookback.num_hours(),
    }))
}
