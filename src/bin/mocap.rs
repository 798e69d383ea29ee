//! Mocap CLI - Command-line interface for Mocap Datasets
//!
//! Commands:
//! - prepare: Build the posture and action datasets from a raw tree
//! - stats: Print per-class statistics over raw sequence folders
//! - config: Print the default tag configuration

use clap::{Parser, Subcommand, ValueEnum};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use mocap_datasets::builder::{DEFAULT_OUTPUT_DIR, DEFAULT_SOURCE_DIR};
use mocap_datasets::table::{render_plain, render_pretty};
use mocap_datasets::{
    BuildSummary, DatasetBuilder, DatasetConfig, DatasetError, DatasetKind, StatsReport, VERSION,
};

/// Mocap - labeled dataset preparation for raw motion-capture sequences
#[derive(Parser)]
#[command(name = "mocap")]
#[command(version = VERSION)]
#[command(about = "Prepare labeled datasets and stats from raw sequence folders", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build datasets/posture and datasets/action from a raw tree
    Prepare {
        /// Raw source directory
        #[arg(default_value = DEFAULT_SOURCE_DIR)]
        source: PathBuf,

        /// Output directory (must not exist)
        #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
        output: PathBuf,

        /// Tag configuration JSON (defaults are used if not provided)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Only build one dataset layout
        #[arg(long, value_enum)]
        only: Option<LayoutArg>,

        /// Output the build summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print per-class statistics over raw sequence folders
    Stats {
        /// One or more raw directories
        #[arg(required = true)]
        roots: Vec<PathBuf>,

        /// Plain fixed-width columns instead of a boxed table
        #[arg(long)]
        plain: bool,

        /// Output as JSON
        #[arg(long, conflicts_with = "plain")]
        json: bool,
    },

    /// Print the default tag configuration as JSON
    Config,
}

#[derive(Clone, Copy, ValueEnum)]
enum LayoutArg {
    /// Posture dataset only
    Posture,
    /// Action dataset only
    Action,
}

impl From<LayoutArg> for DatasetKind {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Posture => DatasetKind::Posture,
            LayoutArg::Action => DatasetKind::Action,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", serde_json::to_string(&CliError::from(e)).unwrap_or_else(|_| "Unknown error".to_string()));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), MocapCliError> {
    match cli.command {
        Commands::Prepare {
            source,
            output,
            config,
            only,
            json,
        } => cmd_prepare(&source, &output, config.as_deref(), only, json),

        Commands::Stats { roots, plain, json } => cmd_stats(&roots, plain, json),

        Commands::Config => cmd_config(),
    }
}

fn cmd_prepare(
    source: &Path,
    output: &Path,
    config: Option<&Path>,
    only: Option<LayoutArg>,
    json: bool,
) -> Result<(), MocapCliError> {
    let config = match config {
        Some(path) => DatasetConfig::load(path)?,
        None => DatasetConfig::default(),
    };

    let kinds: Vec<DatasetKind> = match only {
        Some(layout) => vec![layout.into()],
        None => DatasetKind::ALL.to_vec(),
    };

    let builder = DatasetBuilder::new(&config, source, output)?;
    let summary = builder.build(&kinds)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_build_summary(&summary);
    }

    Ok(())
}

fn print_build_summary(summary: &BuildSummary) {
    println!("Dataset Build Report");
    println!("====================");
    println!("Source: {}", summary.source.display());
    println!("Output: {}", summary.output.display());

    for dataset in &summary.datasets {
        println!();
        println!("[{}] {}", dataset.kind.dir_name(), dataset.output.display());
        println!("  Directories:  {}", dataset.directories);
        println!("  Files copied: {}", dataset.files_copied);
        println!("  Tags seen:    {}", dataset.tags.join(", "));
    }

    println!();
    println!("Total files copied: {}", summary.files_copied());
}

fn cmd_stats(roots: &[PathBuf], plain: bool, json: bool) -> Result<(), MocapCliError> {
    let report = StatsReport::collect(roots)?;

    if report.is_empty() {
        return Err(MocapCliError::NoSequences);
    }

    let table = report.table();

    if json {
        println!("{}", serde_json::to_string_pretty(&table)?);
    } else if plain || !atty::is(atty::Stream::Stdout) {
        print!("{}", render_plain(&table));
    } else {
        print!("{}", render_pretty(&table));
    }

    Ok(())
}

fn cmd_config() -> Result<(), MocapCliError> {
    println!("{}", DatasetConfig::default().to_json()?);
    Ok(())
}

// Error types

#[derive(Debug)]
enum MocapCliError {
    Dataset(DatasetError),
    Json(serde_json::Error),
    NoSequences,
}

impl From<DatasetError> for MocapCliError {
    fn from(e: DatasetError) -> Self {
        MocapCliError::Dataset(e)
    }
}

impl From<serde_json::Error> for MocapCliError {
    fn from(e: serde_json::Error) -> Self {
        MocapCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<MocapCliError> for CliError {
    fn from(e: MocapCliError) -> Self {
        match e {
            MocapCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: None,
            },
            MocapCliError::NoSequences => CliError {
                code: "NO_SEQUENCES".to_string(),
                message: "No sequence folders found".to_string(),
                hint: Some("Pass the directories that contain the raw recordings".to_string()),
            },
            MocapCliError::Dataset(e) => {
                let (code, hint) = match &e {
                    DatasetError::OutputExists(_) => (
                        "OUTPUT_EXISTS",
                        Some("Delete it first; a failed earlier run may have left it partially written"),
                    ),
                    DatasetError::MissingSource(_) => {
                        ("MISSING_SOURCE", Some("Pass the raw data directory as SOURCE"))
                    }
                    DatasetError::InvalidConfig(_)
                    | DatasetError::InvalidRegex { .. }
                    | DatasetError::Json(_) => (
                        "INVALID_CONFIG",
                        Some("Run `mocap config` to see the expected format"),
                    ),
                    DatasetError::InvalidTimestamp(_) => (
                        "INVALID_TIMESTAMP",
                        Some("Sequence folders must only contain <timestamp>.<ext> files"),
                    ),
                    DatasetError::UnexpectedTagConflict { .. } => (
                        "TAG_CONFLICT",
                        Some("Add a precedence rule for this pair to the config"),
                    ),
                    DatasetError::NameExhausted(_) => ("NAME_EXHAUSTED", None),
                    DatasetError::Io { .. } | DatasetError::Walk(_) => {
                        ("IO_ERROR", Some("Check file paths and permissions"))
                    }
                };
                CliError {
                    code: code.to_string(),
                    message: e.to_string(),
                    hint: hint.map(str::to_string),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_exists_hint_mentions_partial_runs() {
        let err = MocapCliError::Dataset(DatasetError::OutputExists(PathBuf::from("datasets")));
        let report = CliError::from(err);
        assert_eq!(report.code, "OUTPUT_EXISTS");
        assert!(report.hint.unwrap().contains("partially written"));
    }
}
