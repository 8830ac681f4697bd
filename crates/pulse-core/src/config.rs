use crate::error::{PulseError, Result};
use crate::types::Identity;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// File name looked up by the CLI when no explicit path is given.
pub const CONFIG_FILE: &str = "pulse.yaml";

pub const DEFAULT_API_URL: &str = "https://api.github.com";

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// RepoConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoConfig {
    /// Repository owner (user or organization).
    pub owner: String,
    pub name: String,
    /// API base URL; points at a mock server in tests.
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    pub repo: RepoConfig,
    /// Ordered identity roster; snapshot records follow this order.
    #[serde(default)]
    pub roster: Vec<Identity>,
    /// Trailing window length for every check.
    #[serde(default = "default_window_hours")]
    pub window_hours: u32,
}

fn default_version() -> u32 {
    1
}

fn default_window_hours() -> u32 {
    24
}

impl Config {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            version: 1,
            repo: RepoConfig {
                owner: owner.into(),
                name: name.into(),
                api_url: default_api_url(),
            },
            roster: Vec::new(),
            window_hours: default_window_hours(),
        }
    }

    pub fn lookback(&self) -> chrono::Duration {
        chrono::Duration::hours(i64::from(self.window_hours))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(PulseError::ConfigNotFound(path.display().to_string()));
        }
        let data = std::fs::read_to_string(path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        atomic_write(path, data.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.repo.owner.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "repo.owner is empty".to_string(),
            });
        }
        if self.repo.name.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "repo.name is empty".to_string(),
            });
        }
        if !self.repo.api_url.starts_with("http://") && !self.repo.api_url.starts_with("https://") {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!("repo.api_url '{}' is not an http(s) URL", self.repo.api_url),
            });
        }

        if self.roster.is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "roster is empty: add at least one identity to track".to_string(),
            });
        }

        // Duplicates are allowed (each occurrence gets its own record)
        // but usually a mistake, so call them out.
        let mut seen = HashSet::new();
        for identity in &self.roster {
            if !seen.insert(identity.as_str()) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!(
                        "duplicate identity '{}' in roster: it will be queried and reported twice",
                        identity
                    ),
                });
            }
        }

        if self.window_hours == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "window_hours is 0: the activity window is empty and every identity \
                          will read as inactive"
                    .to_string(),
            });
        }

        warnings
    }

    /// True if any validation finding is error-level. Callers abort
    /// before issuing queries in that case.
    pub fn has_errors(&self) -> bool {
        self.validate()
            .iter()
            .any(|w| w.level == WarnLevel::Error)
    }
}

/// Atomically write `data` to `path` using a tempfile in the same
/// directory, so a crash mid-write cannot corrupt the config.
fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
