//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod build;
mod info;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Unibuild - dispatch engine batch builds per target platform
#[derive(Parser)]
#[command(name = "unibuild")]
#[command(about = "Unibuild - resolve a target platform and dispatch an engine batch build")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build one target platform by token (e.g. Win64, Android)
    Build {
        /// Platform token, matched case-sensitively against the registry
        target: String,

        /// Path to unibuild.toml (default: discovered by walking up)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the product name from config
        #[arg(short, long)]
        name: Option<String>,

        /// Override the engine executable from config
        #[arg(long)]
        engine: Option<PathBuf>,

        /// Development build with debugging allowed
        #[arg(long)]
        debug: bool,

        /// Print destination and scene list before building
        #[arg(short, long)]
        verbose: bool,
    },
    /// Build from an engine-style argument vector (-buildTarget <token>)
    Batch {
        /// Raw arguments, scanned for the first -buildTarget flag
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,

        /// Path to unibuild.toml (default: discovered by walking up)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Development build with debugging allowed
        #[arg(long)]
        debug: bool,

        /// Print destination and scene list before building
        #[arg(short, long)]
        verbose: bool,
    },
    /// List registered target platforms
    Targets,
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { target, config, name, engine, debug, verbose } => build::run_build(
            &target,
            config.as_deref(),
            name.as_deref(),
            engine.as_deref(),
            debug,
            verbose,
        ),
        Commands::Batch { args, config, debug, verbose } => {
            build::run_batch(&args, config.as_deref(), debug, verbose)
        }
        Commands::Targets => info::run_targets(),
    }
}
