//! CLI command definitions.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::generator::GeneratorProfile;
use crate::project::ProjectId;
use crate::query::{SortDirection, SortField, SortItem, SortModel};

/// Where client-side commands load projects from.
///
/// With no flag set, projects are generated in-process.
#[derive(Debug, Clone, Default, Args)]
pub struct SourceArgs {
    /// Fetch from the configured client endpoint
    #[arg(long, conflicts_with_all = ["url", "dump"])]
    pub remote: bool,

    /// Fetch from this endpoint URL
    #[arg(long, value_name = "URL", conflicts_with = "dump")]
    pub url: Option<String>,

    /// Read a JSON dump file
    #[arg(long, value_name = "FILE")]
    pub dump: Option<PathBuf>,
}

/// Sort flags shared by `query` and `export`.
#[derive(Debug, Clone, Default, Args)]
pub struct SortArgs {
    /// Column to sort by
    #[arg(short, long, value_enum)]
    pub sort: Option<SortFieldArg>,

    /// Sort descending
    #[arg(long, requires = "sort")]
    pub desc: bool,
}

impl SortArgs {
    /// The sort model these flags describe.
    #[must_use]
    pub fn model(&self) -> SortModel {
        match self.sort {
            Some(field) => SortModel::by(SortItem {
                field: field.into(),
                sort: if self.desc {
                    SortDirection::Desc
                } else {
                    SortDirection::Asc
                },
            }),
            None => SortModel::unsorted(),
        }
    }
}

/// Generate command arguments.
#[derive(Debug, Args)]
pub struct GenerateCommand {
    /// Dump file to write
    #[arg(short, long, default_value = crate::dump::DUMP_FILE_NAME)]
    pub output: PathBuf,

    /// Number of projects (defaults to the configured count)
    #[arg(short = 'n', long)]
    pub count: Option<usize>,

    /// RNG seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,

    /// Naming vocabulary
    #[arg(long, value_enum)]
    pub profile: Option<ProfileArg>,
}

/// Serve command arguments.
#[derive(Debug, Args)]
pub struct ServeCommand {
    /// Address to bind (defaults to the configured address)
    #[arg(short, long, value_name = "ADDR")]
    pub addr: Option<String>,

    /// Serve this dump instead of generating projects
    #[arg(long, value_name = "FILE")]
    pub dump: Option<PathBuf>,
}

/// Query command arguments.
#[derive(Debug, Args)]
pub struct QueryCommand {
    /// Global filter text
    pub filter: Option<String>,

    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub sort: SortArgs,

    /// Page to show, starting at 1
    #[arg(short, long, default_value = "1")]
    pub page: usize,

    /// Rows per page: 25, 50 or 100 (defaults to the configured size)
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Select a project and show its popup
    #[arg(long, value_name = "ID")]
    pub select: Option<ProjectId>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Stats command arguments.
#[derive(Debug, Args)]
pub struct StatsCommand {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Global filter text
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Export command arguments.
#[derive(Debug, Args)]
pub struct ExportCommand {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Global filter text
    #[arg(short, long)]
    pub filter: Option<String>,

    #[command(flatten)]
    pub sort: SortArgs,

    /// File or directory to write (defaults to a dated file name here)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Sort column argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortFieldArg {
    /// Project id
    Id,
    /// Project name
    #[value(alias = "name")]
    ProjectName,
    /// Latitude
    #[value(alias = "lat")]
    Latitude,
    /// Longitude
    #[value(aliases = ["lon", "lng"])]
    Longitude,
    /// Status
    Status,
    /// Last updated
    #[value(alias = "updated")]
    LastUpdated,
}

impl From<SortFieldArg> for SortField {
    fn from(arg: SortFieldArg) -> Self {
        match arg {
            SortFieldArg::Id => Self::Id,
            SortFieldArg::ProjectName => Self::ProjectName,
            SortFieldArg::Latitude => Self::Latitude,
            SortFieldArg::Longitude => Self::Longitude,
            SortFieldArg::Status => Self::Status,
            SortFieldArg::LastUpdated => Self::LastUpdated,
        }
    }
}

/// Generator profile argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProfileArg {
    /// Large vocabulary, random name numbers
    Full,
    /// Small vocabulary, landmark projects first
    Compact,
}

impl From<ProfileArg> for GeneratorProfile {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::Full => Self::Full,
            ProfileArg::Compact => Self::Compact,
        }
    }
}

/// Output format for `query`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Paged text table
    #[default]
    Table,
    /// JSON array of the page
    Json,
    /// CSV of the page
    Csv,
}
