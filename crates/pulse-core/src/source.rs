use crate::types::Identity;
use crate::window::ActivityWindow;
use async_trait::async_trait;
use thiserror::Error;

/// Failure of a single source query.
///
/// These never escalate past the query task: the task converts any of
/// them into an unreachable record and the cause goes to the log, not
/// into the snapshot.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The request never completed (connect failure, timeout, broken
    /// transport).
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    /// The payload did not parse as the expected list-like structure.
    #[error("malformed payload: {0}")]
    Schema(String),
}

/// Black-box view of the remote code-hosting service.
///
/// One implementation call is one best-effort attempt: no retries here
/// and none above. Both counts are lengths of whatever single-page list
/// the service returns for the identity inside the window.
#[async_trait]
pub trait ActivitySource: Send + Sync {
    /// Number of commits authored by `identity` within `window`.
    async fn commit_count(
        &self,
        identity: &Identity,
        window: &ActivityWindow,
    ) -> Result<u64, SourceError>;

    /// Number of issues opened by `identity` within `window`.
    async fn issue_count(
        &self,
        identity: &Identity,
        window: &ActivityWindow,
    ) -> Result<u64, SourceError>;
}
