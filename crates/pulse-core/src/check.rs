use crate::error::PulseError;
use crate::snapshot::{ActivityRecord, Snapshot};
use crate::source::ActivitySource;
use crate::types::Identity;
use crate::window::ActivityWindow;
use chrono::{Duration, Utc};
use futures::future::join_all;

// ---------------------------------------------------------------------------
// Checker
// ---------------------------------------------------------------------------

/// Capture one activity snapshot for the whole roster.
///
/// Computes a single window trailing `lookback` and ending now, queries
/// every identity concurrently against it, and folds the outcomes into a
/// [`Snapshot`] in roster order. An identity whose queries fail becomes
/// an unreachable placeholder record; it never fails the invocation.
/// The only invocation-level error is an empty roster.
///
/// # Example
///
/// ```rust,ignore
/// use pulse_core::{check_activity, Identity};
///
/// let roster = vec![Identity::from("alice"), Identity::from("bob")];
/// let snapshot = check_activity(&source, &roster, chrono::Duration::hours(24)).await?;
/// println!("{}", snapshot.status());
/// ```
pub async fn check_activity(
    source: &dyn ActivitySource,
    roster: &[Identity],
    lookback: Duration,
) -> Result<Snapshot, PulseError> {
    let window = ActivityWindow::trailing(lookback, Utc::now());
    check_activity_in(source, roster, window).await
}

/// Like [`check_activity`] but against an explicit, caller-computed
/// window. Lets tests pin "now"; `check_activity` is this plus the
/// trailing-window computation.
pub async fn check_activity_in(
    source: &dyn ActivitySource,
    roster: &[Identity],
    window: ActivityWindow,
) -> Result<Snapshot, PulseError> {
    if roster.is_empty() {
        return Err(PulseError::EmptyRoster);
    }

    tracing::debug!(
        roster = roster.len(),
        since = %window.since,
        until = %window.until,
        "checking roster activity"
    );

    // One task per identity, joined as a single barrier. join_all yields
    // outcomes in input order, so the records line up with the roster no
    // matter which query finishes first, and no task is cancelled because
    // a sibling failed.
    let tasks = roster.iter().map(|id| query_identity(source, id, &window));
    let records: Vec<ActivityRecord> = join_all(tasks).await;

    let snapshot = Snapshot::from_records(records);
    if snapshot.partial {
        tracing::warn!(
            failed = snapshot.records.iter().filter(|r| r.failed).count(),
            total = snapshot.records.len(),
            "snapshot is partial"
        );
    }
    Ok(snapshot)
}

/// Query both sources for one identity. Never fails: any query error is
/// normalized into an unreachable record, with the cause logged here and
/// nowhere else.
pub async fn query_identity(
    source: &dyn ActivitySource,
    identity: &Identity,
    window: &ActivityWindow,
) -> ActivityRecord {
    // The two legs are independent; run them concurrently.
    let (commits, issues) = tokio::join!(
        source.commit_count(identity, window),
        source.issue_count(identity, window),
    );

    match (commits, issues) {
        (Ok(commit_count), Ok(issue_count)) => {
            ActivityRecord::observed(identity.clone(), commit_count, issue_count)
        }
        (commits, issues) => {
            if let Err(e) = &commits {
                tracing::warn!(identity = %identity, error = %e, "commit query failed");
            }
            if let Err(e) = &issues {
                tracing::warn!(identity = %identity, error = %e, "issue query failed");
            }
            ActivityRecord::unreachable(identity.clone())
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
