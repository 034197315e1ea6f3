// SPDX-FileCopyrightText: 2026 Maitre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Maitre - restaurant call-button mission engine.
//!
//! Binary entry point: loads configuration, opens storage, and exposes the
//! operational subcommands.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod reset;
mod status;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use maitre_config::MaitreConfig;
use maitre_core::MaitreError;
use maitre_engine::{LogNotifier, MissionEngine};
use maitre_storage::SqliteRepository;

/// Maitre - restaurant call-button mission engine.
#[derive(Parser, Debug)]
#[command(name = "maitre", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Show open missions grouped by place.
    Status {
        /// Output structured JSON for scripting.
        #[arg(long)]
        json: bool,
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
    /// Cancel every open mission (end-of-shift reset).
    Reset,
}

fn init_tracing(config: &MaitreConfig) {
    // RUST_LOG wins over the configured level.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.service.log_level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run(cli: Cli, config: MaitreConfig) -> Result<(), MaitreError> {
    let repository = Arc::new(SqliteRepository::open(&config.storage).await?);

    match cli.command {
        Some(Commands::Status { json, plain }) => {
            status::run_status(repository.as_ref(), json, plain).await?;
        }
        Some(Commands::Reset) => {
            let notifier = Arc::new(LogNotifier);
            let engine = MissionEngine::new(
                repository.clone(),
                notifier,
                config.missions.track_serve_mission,
            );
            reset::run_reset(&engine).await?;
        }
        None => {
            println!("maitre: use --help for available commands");
        }
    }

    repository.close().await
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match maitre_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            maitre_config::render_errors(&errors);
            std::process::exit(1);
        }
    };
    init_tracing(&config);

    if let Err(e) = run(cli, config).await {
        eprintln!("maitre: {e}");
        std::process::exit(1);
    }
}
