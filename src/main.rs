use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

mod cli_bin;

use cli_bin::args::{Cli, Commands};
use cli_bin::commands::{group_command, list_command, show_command, stats_command};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else if cli.quiet {
        LevelFilter::Error
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match cli.command {
        Commands::List(args) => list_command(args),
        Commands::Group(args) => group_command(args),
        Commands::Stats(args) => stats_command(args),
        Commands::Show(args) => show_command(args),
    }
}
