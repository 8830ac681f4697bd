//! Roster activity snapshot engine.
//!
//! Given a fixed roster of identities and an [`ActivitySource`] (the
//! remote code-hosting service, abstracted to two count queries), the
//! checker fans out one query task per identity over a shared trailing
//! time window and folds every outcome into a single [`Snapshot`].
//! A failing identity becomes an unreachable placeholder record instead
//! of failing the check, so one dead source never hides the rest of the
//! roster.
//!
//! # Architecture
//!
//! ```text
//! roster: [Identity]          ActivityWindow (one per invocation)
//!     │                            │
//!     ▼                            ▼
//! check_activity ──► query_identity × N   ← concurrent, join-all barrier
//!                        │   commit_count / issue_count (tokio::join!)
//!                        ▼
//!                    ActivityRecord        ← failure normalized here
//!                        │
//!                        ▼
//!                    Snapshot { records in roster order, partial }
//! ```
//!
//! # Quick start
//!
//! ```rust,ignore
//! use pulse_core::{check_activity, Identity};
//!
//! let roster: Vec<Identity> = vec!["alice".into(), "bob".into()];
//! let snapshot = check_activity(&source, &roster, chrono::Duration::hours(24)).await?;
//! for record in &snapshot.records {
//!     println!("{}: {}", record.identity, record.activity());
//! }
//! ```

pub mod check;
pub mod config;
pub mod error;
pub mod snapshot;
pub mod source;
pub mod types;
pub mod window;

pub use check::{check_activity, check_activity_in, query_identity};
pub use config::{Config, ConfigWarning, RepoConfig, WarnLevel, CONFIG_FILE, DEFAULT_API_URL};
pub use error::{PulseError, Result};
pub use snapshot::{ActivityRecord, Snapshot};
pub use source::{ActivitySource, SourceError};
pub use types::{Activity, Identity, SnapshotStatus};
pub use window::ActivityWindow;
