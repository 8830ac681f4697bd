use thiserror::Error;

/// Invocation-level failures. Per-identity query failures are never
/// represented here; they are folded into the snapshot as failed
/// records (see [`crate::source::SourceError`]).
#[derive(Debug, Error)]
pub enum PulseError {
    #[error("config not found at {0}: run 'pulse init'")]
    ConfigNotFound(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("roster is empty: add at least one identity to track")]
    EmptyRoster,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, PulseError>;
