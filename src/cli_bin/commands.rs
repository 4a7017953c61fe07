//! CLI command handlers that bridge CLI arguments to library operations

use crate::cli_bin::args::*;
use anyhow::{bail, Context, Result};
use log::{debug, info, warn};
use matterdex::config::CatalogConfig;
use matterdex::core::{FieldValue, Record, Schema};
use matterdex::io::{render_frontmatter, DocumentReader};
use matterdex::query::{
    compute_stats, filter_all, group_by_field, group_by_list_field, group_by_month, group_by_status,
    group_by_year, sort_by_fields, FilterClause, Group, GroupKey, SortSpec,
};
use serde::Serialize;
use std::path::Path;

/// Execute the list command
pub fn list_command(args: ListArgs) -> Result<()> {
    let config = load_config(args.catalog.config.as_deref())?;
    let records = read_catalog(&args.catalog, &config)?;
    let mut selected = select(&records, &config.schema, &args.query)?;
    if let Some(limit) = args.limit {
        selected.truncate(limit);
    }
    debug!("{} of {} records selected", selected.len(), records.len());

    match args.format {
        OutputFormat::Text => {
            for record in &selected {
                println!("{}\t{}", record.id(), record.title(&config.schema));
            }
        }
        format => output_serialized(&selected, format)?,
    }
    Ok(())
}

/// Bucket as printed by the group command
#[derive(Serialize)]
struct GroupOutput<'a> {
    key: &'a GroupKey,
    count: usize,
    ids: Vec<&'a str>,
}

/// Execute the group command
pub fn group_command(args: GroupArgs) -> Result<()> {
    let config = load_config(args.catalog.config.as_deref())?;
    let schema = &config.schema;
    let records = read_catalog(&args.catalog, &config)?;
    let selected = select(&records, schema, &args.query)?;

    let field = match (args.mode, args.by.as_deref()) {
        (GroupMode::Status, _) => "",
        (_, Some(field)) => field,
        (_, None) => bail!("--by is required for --mode {:?}", args.mode),
    };
    let groups: Vec<Group<&Record>> = match args.mode {
        GroupMode::Value => group_by_field(&selected, field),
        GroupMode::List => group_by_list_field(&selected, schema, field)?,
        GroupMode::Year => group_by_year(&selected, field),
        GroupMode::Month => group_by_month(&selected, field),
        GroupMode::Status => group_by_status(&selected, schema)?,
    };

    match args.format {
        OutputFormat::Text => {
            for group in &groups {
                println!("{} ({})", group.key, group.len());
                for record in &group.records {
                    println!("  {}\t{}", record.id(), record.title(schema));
                }
            }
        }
        format => {
            let output: Vec<GroupOutput> = groups
                .iter()
                .map(|g| GroupOutput {
                    key: &g.key,
                    count: g.len(),
                    ids: g.records.iter().map(|r| r.id()).collect(),
                })
                .collect();
            output_serialized(&output, format)?;
        }
    }
    Ok(())
}

/// Execute the stats command
pub fn stats_command(args: StatsArgs) -> Result<()> {
    let config = load_config(args.catalog.config.as_deref())?;
    let records = read_catalog(&args.catalog, &config)?;
    let query = QueryOptions {
        clauses: args.clauses,
        sort: Vec::new(),
    };
    let selected = select(&records, &config.schema, &query)?;
    let stats = compute_stats(&selected, &config.schema, &config.stats);

    match args.format {
        OutputFormat::Text => {
            println!("records: {}", stats.count);
            if let Some(field) = &config.stats.total_field {
                println!("{} total: {}", field, FieldValue::Number(stats.total));
                println!("{} average: {:.2}", field, stats.average);
            }
            for (field, n) in &stats.distinct {
                println!("distinct {}: {}", field, n);
            }
            if let (Some(field), Some(range)) = (&config.stats.range_field, &stats.range) {
                println!(
                    "{} range: {} to {}",
                    field,
                    FieldValue::Number(range.min),
                    FieldValue::Number(range.max)
                );
            }
            for (status, n) in &stats.by_status.values {
                println!("status {}: {}", status, n);
            }
            if stats.by_status.absent > 0 {
                println!("no status: {}", stats.by_status.absent);
            }
        }
        format => output_serialized(&stats, format)?,
    }
    Ok(())
}

/// Execute the show command
pub fn show_command(args: ShowArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let reader = DocumentReader::with_config(config.schema.clone(), config.to_reader_config());
    let record = reader
        .read_file(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;

    match args.format {
        OutputFormat::Text => {
            println!("# {}", record.id());
            print!("{}", render_frontmatter(record.fields()));
        }
        format => output_serialized(&record, format)?,
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<CatalogConfig> {
    match path {
        Some(path) => CatalogConfig::load(path)
            .with_context(|| format!("failed to load configuration from {}", path.display())),
        None => {
            debug!("no configuration given, using the default schema");
            Ok(CatalogConfig::default())
        }
    }
}

fn read_catalog(options: &CatalogOptions, config: &CatalogConfig) -> Result<Vec<Record>> {
    let mut reader_config = config.to_reader_config();
    if !options.extensions.is_empty() {
        reader_config.extensions = options.extensions.clone();
    }

    let reader = DocumentReader::with_config(config.schema.clone(), reader_config);
    let records = reader
        .read_paths(&options.files)
        .context("failed to read documents")?;
    if records.is_empty() {
        warn!("No documents found to process");
    } else {
        info!("cataloged {} documents", records.len());
    }
    Ok(records)
}

/// Apply the filter clauses, then the sort keys
fn select<'a>(records: &'a [Record], schema: &Schema, query: &QueryOptions) -> Result<Vec<&'a Record>> {
    let clauses = query
        .clauses
        .iter()
        .map(|c| FilterClause::parse(c, schema))
        .collect::<matterdex::Result<Vec<_>>>()?;
    let specs = query
        .sort
        .iter()
        .map(|s| SortSpec::parse(s))
        .collect::<matterdex::Result<Vec<_>>>()?;

    let borrowed: Vec<&Record> = records.iter().collect();
    let filtered = filter_all(&borrowed, &clauses);
    Ok(sort_by_fields(&filtered, schema, &specs))
}

fn output_serialized<T: Serialize + ?Sized>(value: &T, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Yaml | OutputFormat::Text => print!("{}", serde_yaml::to_string(value)?),
    }
    Ok(())
}
