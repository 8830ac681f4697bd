pub mod check;
pub mod init;
pub mod serve;

use pulse_core::{Config, WarnLevel};
use pulse_github::GithubSource;

/// Print warning-level findings to stderr; fail on the first
/// error-level one so no query is issued against a broken config.
pub(crate) fn validate_or_bail(config: &Config) -> anyhow::Result<()> {
    let mut errors = Vec::new();
    for finding in config.validate() {
        match finding.level {
            WarnLevel::Warning => eprintln!("warning: {}", finding.message),
            WarnLevel::Error => errors.push(finding.message),
        }
    }
    match errors.first() {
        Some(first) => anyhow::bail!("invalid config: {first}"),
        None => Ok(()),
    }
}

/// Build the GitHub source from config plus the ambient `GITHUB_TOKEN`.
pub(crate) fn github_source(config: &Config) -> GithubSource {
    let token = std::env::var("GITHUB_TOKEN")
        .ok()
        .filter(|t| !t.is_empty());
    GithubSource::new(config.repo.owner.as_str(), config.repo.name.as_str())
        .with_api_url(config.repo.api_url.as_str())
        .with_token(token)
}
