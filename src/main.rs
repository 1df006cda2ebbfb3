//! Command-line entry point for working with Qt Linguist catalogs.

use std::fs::File;
use std::io::Write;
use std::path::{
    Path,
    PathBuf,
};
use std::process::ExitCode;

use clap::{
    Parser,
    Subcommand,
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use ts_catalog::check::has_errors;
use ts_catalog::commands::{
    self,
    LookupQuery,
};
use ts_catalog::config::ConfigManager;
use ts_catalog::error::CatalogError;
use ts_catalog::lookup::LookupOutcome;
use ts_catalog::merge::{
    LocationPolicy,
    ObsoletePolicy,
};

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "ts-catalog")]
#[command(version)]
#[command(about = "Load, look up, merge and check Qt Linguist translation catalogs")]
struct Cli {
    /// Operation to run.
    #[command(subcommand)]
    command: Command,

    /// Settings file to use instead of `.ts-catalog.json` in the working directory
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Translate one source text
    Lookup {
        /// Catalog to read
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Context name, e.g. Arch_Wall
        #[arg(value_name = "CONTEXT")]
        context: String,
        /// Source text as it appears in the code
        #[arg(value_name = "SOURCE")]
        source: String,

        /// Disambiguation comment
        #[arg(long)]
        comment: Option<String>,

        /// Count for a plural message
        #[arg(short = 'n', long, allow_negative_numbers = true)]
        count: Option<i64>,
    },

    /// Merge a fresh extraction into an existing catalog
    Merge {
        /// Existing translated catalog
        #[arg(value_name = "OLD")]
        old: PathBuf,
        /// Catalog freshly extracted from the sources
        #[arg(value_name = "EXTRACTION")]
        extraction: PathBuf,

        /// Output file (default: overwrite OLD)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Drop translations whose source disappeared
        #[arg(long)]
        drop_obsolete: bool,

        /// Only carry translations over on exact matches
        #[arg(long)]
        no_similar: bool,

        /// Strip location elements from the output
        #[arg(long)]
        no_locations: bool,
    },

    /// Report quality problems in catalogs
    Check {
        /// Catalog files or directories to search
        #[arg(value_name = "PATH", required = true)]
        paths: Vec<PathBuf>,
    },

    /// Show translation progress
    Stats {
        /// Catalog to count
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Rewrite catalogs in their own layout
    Fmt {
        /// Catalogs to rewrite
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /// Only report files that would change
        #[arg(long)]
        check: bool,
    },
}

/// Failure of a whole run, as opposed to findings it reports.
#[derive(Debug, thiserror::Error)]
enum RunError {
    /// Loading, saving or configuration failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Standard output is gone.
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),

    /// Statistics could not be encoded.
    #[error("Failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Exit code 1 means findings or pending reformatting, 2 a failed run.
fn main() -> ExitCode {
    let cli = Cli::parse();
    let _guard = match init_tracing(cli.verbose, cli.log_file.as_deref()) {
        Ok(guard) => guard,
        Err(error) => {
            report_error(&format!("Failed to open log file: {error}"));
            return ExitCode::from(2);
        }
    };

    match run(cli) {
        Ok(code) => code,
        Err(error) => {
            tracing::debug!("Run failed: {:?}", error);
            report_error(&error.to_string());
            ExitCode::from(2)
        }
    }
}

/// Installs the subscriber. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8, log_file: Option<&Path>) -> std::io::Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if let Some(path) = log_file {
        let (writer, guard) = tracing_appender::non_blocking(File::create(path)?);
        builder.with_writer(writer).with_ansi(false).init();
        Ok(Some(guard))
    } else {
        builder.with_writer(std::io::stderr).init();
        Ok(None)
    }
}

/// Prints `message` to stderr.
fn report_error(message: &str) {
    let _ = writeln!(std::io::stderr().lock(), "error: {message}");
}

/// Settings from `--config`, else from the working directory.
fn load_settings(config: Option<&Path>) -> Result<ConfigManager, CatalogError> {
    let mut manager = ConfigManager::new();
    match config {
        Some(path) => manager.load_file(path)?,
        None => manager.load_settings(std::env::current_dir().ok())?,
    }
    Ok(manager)
}

/// Executes the subcommand.
fn run(cli: Cli) -> Result<ExitCode, RunError> {
    let manager = load_settings(cli.config.as_deref())?;
    let settings = manager.get_settings();
    let mut out = std::io::stdout().lock();

    match cli.command {
        Command::Lookup { file, context, source, comment, count } => {
            let query = LookupQuery {
                context: &context,
                source: &source,
                comment: comment.as_deref(),
                count,
            };
            let answer = commands::lookup(&file, query)?;
            if let LookupOutcome::Fallback(miss) = answer.outcome {
                tracing::info!("No translation ({miss}), using the source text");
            }
            writeln!(out, "{}", answer.text)?;
        }
        Command::Merge { old, extraction, output, drop_obsolete, no_similar, no_locations } => {
            let mut options = settings.merge.to_options();
            if drop_obsolete {
                options.obsolete_policy = ObsoletePolicy::Drop;
            }
            if no_similar {
                options.match_similar = false;
            }
            if no_locations {
                options.locations = LocationPolicy::None;
            }
            let report = commands::merge_files(&old, &extraction, output.as_deref(), &options)?;
            writeln!(out, "{report}")?;
        }
        Command::Check { paths } => {
            let results = commands::check_paths(&paths, settings)?;
            let mut failed = false;
            for file in &results {
                for finding in &file.findings {
                    writeln!(out, "{}: {finding}", file.path.display())?;
                }
                failed |= has_errors(&file.findings);
            }
            if failed {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Stats { file, json } => {
            let stats = commands::stats(&file)?;
            if json {
                serde_json::to_writer_pretty(&mut out, &stats)?;
                writeln!(out)?;
            } else {
                write!(out, "{stats}")?;
            }
        }
        Command::Fmt { files, check } => {
            let changed = commands::format_files(&files, check)?;
            for path in &changed {
                writeln!(out, "{}", path.display())?;
            }
            if check && !changed.is_empty() {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
