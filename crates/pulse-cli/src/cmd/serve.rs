use pulse_core::Config;
use pulse_server::AppState;
use std::path::Path;
use std::sync::Arc;

use crate::cmd::{github_source, validate_or_bail};

pub fn run(config_path: &Path, port: u16) -> anyhow::Result<()> {
    let config = Config::load(config_path)?;
    validate_or_bail(&config)?;

    tracing::info!(
        owner = %config.repo.owner,
        repo = %config.repo.name,
        roster = config.roster.len(),
        "starting reporter"
    );

    let source = Arc::new(github_source(&config));
    let state = AppState::new(source, config.roster.clone(), config.lookback());

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
        let url = format!("http://localhost:{}", listener.local_addr()?.port());
        println!("pulse reporter → {url}");
        println!("POST {url}/api/check to capture a snapshot");

        tokio::select! {
            res = pulse_server::serve_on(state, listener) => res,
            _ = tokio::signal::ctrl_c() => Ok(()),
        }
    })
}
