// SPDX-FileCopyrightText: 2026 Planwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Planwright - QA test-plan generator for issue-tracker tickets.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod app;
mod check;
mod generate;
mod serve;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use planwright_config::PlanwrightConfig;
use planwright_core::ProviderKind;

/// Planwright - QA test-plan generator for issue-tracker tickets.
#[derive(Parser, Debug)]
#[command(name = "planwright", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP API server.
    Serve,
    /// Generate a test plan for one ticket and print it to stdout.
    Generate {
        /// Ticket key, e.g. QA-123.
        ticket: String,
        /// Template id (defaults to the default template).
        #[arg(long)]
        template: Option<i64>,
        /// Provider: cloud or local (defaults to the saved default).
        #[arg(long)]
        provider: Option<ProviderKind>,
    },
    /// Validate configuration and print the effective values.
    CheckConfig,
}

fn load_config(path: Option<&PathBuf>) -> Option<PlanwrightConfig> {
    let loaded = match path {
        Some(p) => planwright_config::load_and_validate_path(p),
        None => planwright_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => Some(config),
        Err(errors) => {
            planwright_config::render_errors(&errors);
            None
        }
    }
}

/// Initializes the tracing subscriber. Logs go to stderr so `generate`
/// output on stdout stays clean.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("planwright={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let Some(config) = load_config(cli.config.as_ref()) else {
        return ExitCode::FAILURE;
    };

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Generate {
            ticket,
            template,
            provider,
        }) => generate::run_generate(config, &ticket, template, provider).await,
        Some(Commands::CheckConfig) => check::run_check_config(&config),
        None => {
            println!("planwright: use --help for available commands");
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
