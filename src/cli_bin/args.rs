//! Command-line argument definitions
//!
//! The binary acts as the host around the library: it enumerates documents,
//! loads the catalog configuration, and prints query results.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Main CLI application
#[derive(Parser)]
#[command(
    name = "matterdex",
    version,
    about = "Catalog markdown documents by their front matter",
    long_about = "matterdex reads the front matter of markdown documents, types it against a \
                  configured schema, and filters, sorts, groups and summarises the resulting \
                  catalog."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// List matching records
    List(ListArgs),
    /// Group matching records into buckets
    Group(GroupArgs),
    /// Print a statistics snapshot of matching records
    Stats(StatsArgs),
    /// Show the typed front matter of a single document
    Show(ShowArgs),
}

/// Where the catalog comes from
#[derive(Args, Debug, Clone)]
pub struct CatalogOptions {
    /// Files or directories to catalog
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Catalog configuration file (YAML, or JSON by extension)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Only read files with these extensions (overrides the configuration)
    #[arg(long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,
}

/// Record selection
#[derive(Args, Debug, Clone, Default)]
pub struct QueryOptions {
    /// Filter clause, repeatable: field=value, field!=value, field~text,
    /// field!~text, field@min..max
    #[arg(short = 'w', long = "where", value_name = "CLAUSE")]
    pub clauses: Vec<String>,

    /// Sort key, repeatable, first has the highest precedence: field[:asc|:desc]
    #[arg(short, long, value_name = "FIELD[:DIR]")]
    pub sort: Vec<String>,
}

/// Arguments for the list command
#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub catalog: CatalogOptions,

    #[command(flatten)]
    pub query: QueryOptions,

    /// Stop after this many records
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the group command
#[derive(Args, Debug)]
pub struct GroupArgs {
    #[command(flatten)]
    pub catalog: CatalogOptions,

    #[command(flatten)]
    pub query: QueryOptions,

    /// Field to group by (not needed for --mode status)
    #[arg(short, long, value_name = "FIELD")]
    pub by: Option<String>,

    /// How bucket keys are derived from the field
    #[arg(short, long, value_enum, default_value = "value")]
    pub mode: GroupMode,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the stats command
#[derive(Args, Debug)]
pub struct StatsArgs {
    #[command(flatten)]
    pub catalog: CatalogOptions,

    /// Filter clause, repeatable (same syntax as list --where)
    #[arg(short = 'w', long = "where", value_name = "CLAUSE")]
    pub clauses: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "yaml")]
    pub format: OutputFormat,
}

/// Arguments for the show command
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Document to show
    pub file: PathBuf,

    /// Catalog configuration file (YAML, or JSON by extension)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// YAML format
    Yaml,
    /// JSON format
    Json,
}

/// Bucket derivation for the group command
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupMode {
    /// One bucket per field value, absent values in their own bucket
    Value,
    /// One bucket per list item; records may appear in several buckets
    List,
    /// Calendar year, most recent first
    Year,
    /// Calendar month (YYYY-MM), most recent first
    Month,
    /// The schema's status field, in declared option order
    Status,
}
