mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "pulse",
    about = "Point-in-time activity snapshots for a fixed roster of GitHub identities",
    version,
    propagate_version = true
)]
struct Cli {
    /// Config file (default: walk up from cwd looking for pulse.yaml)
    #[arg(long, global = true, env = "PULSE_CONFIG")]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter pulse.yaml
    Init {
        /// Repository owner (user or organization)
        #[arg(long)]
        owner: String,

        /// Repository name
        #[arg(long)]
        repo: String,

        /// Identities to seed the roster with
        identities: Vec<String>,
    },

    /// Check the roster and print a snapshot
    Check {
        /// Override the configured trailing window, in hours
        #[arg(long)]
        window_hours: Option<u32>,
    },

    /// Run the HTTP reporter
    Serve {
        /// Port to listen on
        #[arg(long, default_value = "7878")]
        port: u16,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let config_path = root::resolve_config(cli.config.as_deref());

    let result = match cli.command {
        Commands::Init {
            owner,
            repo,
            identities,
        } => cmd::init::run(&config_path, &owner, &repo, &identities),
        Commands::Check { window_hours } => cmd::check::run(&config_path, window_hours, cli.json),
        Commands::Serve { port } => cmd::serve::run(&config_path, port),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
