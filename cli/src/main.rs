mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::{browse, export, report};
use tracing::Level;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

pub fn run() -> anyhow::Result<()> {
    use clap::Parser;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Commands::Provinces => report::provinces(&cli),
        Commands::Summary(args) => report::summary(&cli, args),
        Commands::Unmatched => report::unmatched(&cli),
        Commands::Indicators => report::indicators(),
        Commands::Table(args) => export::table(&cli, args),
        Commands::Map(args) => export::map(&cli, args),
        Commands::Geojson(args) => export::geojson(&cli, args),
        Commands::Browse => browse::run(&cli),
    }
}

fn main() -> anyhow::Result<()> { run() }
