use anyhow::Context;
use pulse_core::{Config, Identity};
use std::path::Path;

pub fn run(
    config_path: &Path,
    owner: &str,
    repo: &str,
    identities: &[String],
) -> anyhow::Result<()> {
    if config_path.exists() {
        println!("  exists:  {}", config_path.display());
        println!("\nEdit the file directly to change the repository or roster.");
        return Ok(());
    }

    let mut config = Config::new(owner, repo);
    config.roster = identities
        .iter()
        .map(|id| Identity::new(id.as_str()))
        .collect();
    config
        .save(config_path)
        .with_context(|| format!("failed to write {}", config_path.display()))?;
    println!("  created: {}", config_path.display());

    if config.roster.is_empty() {
        println!("\nAdd identities under `roster:`, then run: pulse check");
    } else {
        println!("\nRun: pulse check");
    }
    Ok(())
}
