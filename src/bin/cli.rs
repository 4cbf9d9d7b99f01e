//! fetch-vaa CLI
//!
//! Lists Volcanic Ash Advisories from the configured centres and converts
//! them to KML.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use fetch_vaa::{
    error::{AppError, Result},
    models::{AdvisoryRecord, Config},
    pipeline::{self, ConvertSummary},
};

/// fetch-vaa - Volcanic Ash Advisory fetcher
#[derive(Parser, Debug)]
#[command(
    name = "fetch-vaa",
    version,
    about = "Fetch Volcanic Ash Advisories and convert them to KML"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "fetch-vaa.toml")]
    config: PathBuf,

    /// Directory for converted files (overrides the configuration)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the configured advisory sources
    Sources,

    /// Fetch and list the advisories of a source
    List {
        /// Source identifier (see `sources`)
        source: String,

        /// Maximum number of advisories to list
        #[arg(short, long)]
        limit: Option<usize>,

        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Fetch a source and convert advisories to KML
    Convert {
        /// Source identifier (see `sources`)
        source: String,

        /// Index of an advisory as shown by `list` (repeatable; default all)
        #[arg(short, long = "index")]
        indices: Vec<usize>,

        /// Convert again even if the KML file exists
        #[arg(long)]
        force: bool,
    },

    /// Convert a local advisory file to KML
    Import {
        /// Advisory file (HTML or plain text)
        file: PathBuf,

        /// Convert again even if the KML file exists
        #[arg(long)]
        force: bool,
    },

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn print_records(records: &[AdvisoryRecord]) {
    for (index, record) in records.iter().enumerate() {
        println!("{index:>3}  {}", record.label());
        println!("     {}", record.advisory_url);
        if let Some(graphic) = &record.graphic_url {
            println!("     {graphic}");
        }
    }
}

fn finish_conversion(summary: ConvertSummary) -> Result<()> {
    if summary.failed.is_empty() {
        return Ok(());
    }
    let files: Vec<&str> = summary.failed.iter().map(|(file, _)| file.as_str()).collect();
    Err(AppError::convert(
        files.join(", "),
        format!("{} advisory conversion(s) failed", files.len()),
    ))
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load_or_default(&cli.config);
    if let Some(output_dir) = cli.output_dir {
        config.paths.output_dir = output_dir;
    }
    log::debug!("Output directory: {}", config.paths.output_dir.display());
    let config = Arc::new(config);

    match cli.command {
        Command::Sources => {
            for source in &config.sources {
                println!("{:<10} {} ({})", source.id, source.name, source.url);
            }
        }

        Command::List {
            source,
            limit,
            json,
        } => {
            let outcome = pipeline::run_list(Arc::clone(&config), &source, limit).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&outcome.records)?);
            } else {
                print_records(&outcome.records);
            }
        }

        Command::Convert {
            source,
            indices,
            force,
        } => {
            let summary =
                pipeline::run_convert(Arc::clone(&config), &source, &indices, force).await?;
            finish_conversion(summary)?;
        }

        Command::Import { file, force } => {
            let summary = pipeline::run_import(&config, &file, force).await?;
            finish_conversion(summary)?;
        }

        Command::Validate => {
            pipeline::run_validate(&config)?;
            log::info!("All validations passed!");
        }
    }

    Ok(())
}
