// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! sysdb CLI entry point

use clap::Parser;
use colored::Colorize;

mod cli;
use cli::{Cli, Commands};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments first to get log level
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        log::LevelFilter::Debug
    } else if let Some(level) = cli.log_level {
        level.to_level_filter()
    } else {
        // Default to Warn (can still be overridden by RUST_LOG env var)
        log::LevelFilter::Warn
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    if let Commands::Version = cli.command {
        println!("{} {}", "sysdb".bold().green(), sysdb::VERSION);
        println!("Metadata catalog for vector-data platforms");
        return Ok(());
    }

    if let Err(e) = cli::run(&cli.store, cli.command) {
        eprintln!("{} {}", "Error:".bold().red(), e);
        std::process::exit(1);
    }
    Ok(())
}
