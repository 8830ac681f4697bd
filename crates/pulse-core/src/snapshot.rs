use crate::types::{Activity, Identity, SnapshotStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ActivityRecord
// ---------------------------------------------------------------------------

/// Outcome of querying one identity.
///
/// Invariants, held by the constructors: `active` is true iff either
/// count is positive, and a failed record always carries zero counts;
/// those zeros are placeholders, not a real zero-activity observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub identity: Identity,
    pub commit_count: u64,
    pub issue_count: u64,
    pub active: bool,
    pub failed: bool,
}

impl ActivityRecord {
    /// Record for an identity whose two source queries both succeeded.
    pub fn observed(identity: Identity, commit_count: u64, issue_count: u64) -> Self {
        ActivityRecord {
            identity,
            commit_count,
            issue_count,
            active: commit_count > 0 || issue_count > 0,
            failed: false,
        }
    }

    /// Placeholder record for an identity whose source could not be
    /// queried. Counts are defined as zero and `active` as false.
    pub fn unreachable(identity: Identity) -> Self {
        ActivityRecord {
            identity,
            commit_count: 0,
            issue_count: 0,
            active: false,
            failed: true,
        }
    }

    pub fn activity(&self) -> Activity {
        if self.failed {
            Activity::Unreachable
        } else if self.active {
            Activity::Active
        } else {
            Activity::Inactive
        }
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// One point-in-time view over the whole roster.
///
/// `records` is ordered exactly as the roster that produced it, one
/// record per roster entry, failed or not. A snapshot is never mutated;
/// a fresh check yields a wholly new value that supersedes this one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub records: Vec<ActivityRecord>,
    pub captured_at: DateTime<Utc>,
    pub partial: bool,
}

impl Snapshot {
    /// Assemble a snapshot from already-ordered records, stamping the
    /// current time as the completion time.
    pub fn from_records(records: Vec<ActivityRecord>) -> Self {
        let partial = records.iter().any(|r| r.failed);
        Snapshot {
            records,
            captured_at: Utc::now(),
            partial,
        }
    }

    /// Overall status. Pure over the snapshot; this plus each record's
    /// `active`/`failed` pair is everything a reporter needs.
    pub fn status(&self) -> SnapshotStatus {
        if self.records.is_empty() {
            SnapshotStatus::Empty
        } else if self.partial {
            SnapshotStatus::PartialFailure
        } else {
            SnapshotStatus::AllOk
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> Identity {
        Identity::from(s)
    }

    #[test]
    fn observed_derives_active_from_counts() {
        assert!(ActivityRecord::observed(id("a"), 1, 0).active);
        assert!(ActivityRecord::observed(id("a"), 0, 3).active);
        assert!(ActivityRecord::observed(id("a"), 2, 2).active);
        assert!(!ActivityRecord::observed(id("a"), 0, 0).active);
    }

    #[test]
    fn unreachable_record_is_zeroed_and_inactive() {
        let r = ActivityRecord::unreachable(id("ghost"));
        assert_eq!(r.commit_count, 0);
        assert_eq!(r.issue_count, 0);
        assert!(!r.active);
        assert!(r.failed);
        assert_eq!(r.activity(), Activity::Unreachable);
    }

    #[test]
    fn classification_covers_all_three_states() {
        assert_eq!(
            ActivityRecord::observed(id("a"), 2, 0).activity(),
            Activity::Active
        );
        assert_eq!(
            ActivityRecord::observed(id("b"), 0, 0).activity(),
            Activity::Inactive
        );
        assert_eq!(
            ActivityRecord::unreachable(id("c")).activity(),
            Activity::Unreachable
        );
    }

    #[test]
    fn partial_set_iff_any_record_failed() {
        let clean = Snapshot::from_records(vec![
            ActivityRecord::observed(id("a"), 1, 0),
            ActivityRecord::observed(id("b"), 0, 0),
        ]);
        assert!(!clean.partial);

        let degraded = Snapshot::from_records(vec![
            ActivityRecord::observed(id("a"), 1, 0),
            ActivityRecord::unreachable(id("b")),
        ]);
        assert!(degraded.partial);
    }

    #[test]
    fn status_all_ok_when_nothing_failed() {
        let s = Snapshot::from_records(vec![ActivityRecord::observed(id("a"), 0, 0)]);
        assert_eq!(s.status(), SnapshotStatus::AllOk);
    }

    #[test]
    fn status_partial_failure_when_degraded() {
        let s = Snapshot::from_records(vec![
            ActivityRecord::observed(id("a"), 5, 1),
            ActivityRecord::unreachable(id("b")),
        ]);
        assert_eq!(s.status(), SnapshotStatus::PartialFailure);
    }

    #[test]
    fn status_empty_for_recordless_snapshot() {
        // Defensive arm: the checker never produces this, but the status
        // function must still answer for a hand-built empty snapshot.
        let s = Snapshot::from_records(Vec::new());
        assert_eq!(s.status(), SnapshotStatus::Empty);
        assert!(!s.partial);
    }

    #[test]
    fn snapshot_serializes_records_in_order() {
        let s = Snapshot::from_records(vec![
            ActivityRecord::observed(id("alice"), 2, 0),
            ActivityRecord::unreachable(id("bob")),
        ]);
        let v = serde_json::to_value(&s).unwrap();
        assert_eq!(v["records"][0]["identity"], "alice");
        assert_eq!(v["records"][1]["identity"], "bob");
        assert_eq!(v["records"][1]["failed"], true);
        assert_eq!(v["partial"], true);
    }
}
