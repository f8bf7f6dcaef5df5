// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sw - run parameter sweeps of an external program

mod color;
mod commands;
mod config;
mod env;
mod exit_error;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{collect, repair, run, sweep};

#[derive(Parser)]
#[command(name = "sw", version, about = "Run parameter sweeps", styles = color::styles())]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every job of a sweep file and print the results
    Sweep(sweep::SweepArgs),
    /// Run the job stored in one directory (used by queued jobs)
    Run(run::RunArgs),
    /// Print the results table of a sweep root
    Collect(collect::CollectArgs),
    /// Re-read every job's output files, then print the results table
    Recollect(collect::CollectArgs),
    /// Collect or re-run the broken jobs of a sweep root
    Repair(repair::RepairArgs),
}

fn init_logging() {
    let filter = EnvFilter::try_new(env::log_filter()).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

async fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Sweep(args) => sweep::handle(args).await,
        Commands::Run(args) => run::handle(args).await,
        Commands::Collect(args) => collect::handle(args, false),
        Commands::Recollect(args) => collect::handle(args, true),
        Commands::Repair(args) => repair::handle(args).await,
    }
}

#[tokio::main]
async fn main() {
    init_logging();
    let cli = Cli::parse();
    if let Err(err) = dispatch(cli).await {
        eprintln!("{} {err:#}", color::failure("error:"));
        std::process::exit(exit_error::exit_code(&err));
    }
}
