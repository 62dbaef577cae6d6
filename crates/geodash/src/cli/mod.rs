//! Command-line interface for geodash.
//!
//! This module provides the CLI structure for the `geodash` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ConfigCommand, ExportCommand, GenerateCommand, OutputFormat, ProfileArg, QueryCommand,
    ServeCommand, SortArgs, SortFieldArg, SourceArgs, StatsCommand,
};

use crate::logging::Verbosity;

/// geodash - Synthetic geo-project dashboard
///
/// Serves mock project records over HTTP and browses them as a filterable,
/// sortable table with map selection.
#[derive(Debug, Parser)]
#[command(name = "geodash")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Write generated projects to a JSON dump
    Generate(GenerateCommand),

    /// Serve the project endpoint
    Serve(ServeCommand),

    /// Filter, sort and page through projects
    Query(QueryCommand),

    /// Show dashboard counts
    Stats(StatsCommand),

    /// Export projects to CSV
    Export(ExportCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.verbose, self.quiet)
    }
}
