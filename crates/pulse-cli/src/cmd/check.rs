use anyhow::Context;
use chrono::{DateTime, Duration, Utc};
use pulse_core::{check_activity, Config};
use std::path::Path;

use crate::cmd::{github_source, validate_or_bail};
use crate::output::{print_json, render_table};

pub fn run(config_path: &Path, window_hours: Option<u32>, json: bool) -> anyhow::Result<()> {
    let config = Config::load(config_path)?;
    validate_or_bail(&config)?;

    let lookback = match window_hours {
        Some(hours) => Duration::hours(i64::from(hours)),
        None => config.lookback(),
    };

    let source = github_source(&config);
    let rt = tokio::runtime::Runtime::new()?;
    let snapshot = rt
        .block_on(check_activity(&source, &config.roster, lookback))
        .context("activity check failed")?;

    if snapshot.partial {
        eprintln!("warning: some identities could not be checked; results may be incomplete");
    }

    if json {
        #[derive(serde::Serialize)]
        struct RecordOut<'a> {
            identity: &'a str,
            commit_count: u64,
            issue_count: u64,
            active: bool,
            failed: bool,
            activity: &'static str,
        }

        #[derive(serde::Serialize)]
        struct SnapshotOut<'a> {
            captured_at: DateTime<Utc>,
            window_hours: i64,
            partial: bool,
            status: &'static str,
            records: Vec<RecordOut<'a>>,
        }

        let records: Vec<RecordOut> = snapshot
            .records
            .iter()
            .map(|r| RecordOut {
                identity: r.identity.as_str(),
                commit_count: r.commit_count,
                issue_count: r.issue_count,
                active: r.active,
                failed: r.failed,
                activity: r.activity().as_str(),
            })
            .collect();

        return print_json(&SnapshotOut {
            captured_at: snapshot.captured_at,
            window_hours: lookback.num_hours(),
            partial: snapshot.partial,
            status: snapshot.status().as_str(),
            records,
        });
    }

    // -- Human-readable output ------------------------------------------------

    let rows: Vec<Vec<String>> = snapshot
        .records
        .iter()
        .map(|r| {
            vec![
                r.identity.to_string(),
                r.commit_count.to_string(),
                r.issue_count.to_string(),
                r.activity().to_string(),
            ]
        })
        .collect();

    println!(
        "{}",
        render_table(&["IDENTITY", "COMMITS", "ISSUES", "STATUS"], &rows)
    );
    println!(
        "\ncaptured: {}  window: {}h  status: {}",
        snapshot.captured_at.format("%Y-%m-%d %H:%M:%S UTC"),
        lookback.num_hours(),
        snapshot.status()
    );
    Ok(())
}
