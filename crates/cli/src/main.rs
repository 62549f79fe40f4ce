// rowcol CLI - clean-clean entity clustering from scored candidate pairs

mod cluster;
mod exit_codes;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use exit_codes::EXIT_SUCCESS;

#[derive(Parser)]
#[command(name = "rowcol")]
#[command(about = "Row-column proxy clustering for clean-clean entity resolution")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Log engine stages (overrides RUST_LOG default)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Cluster candidate pairs from a TOML config file
    #[command(after_help = "\
Examples:
  rowcol run restaurants.cluster.toml
  rowcol run restaurants.cluster.toml --json
  rowcol run restaurants.cluster.toml --output clusters.json
  rowcol run restaurants.cluster.toml --threshold 0.7")]
    Run {
        /// Path to the .cluster.toml config file
        config: PathBuf,

        /// Output JSON to stdout instead of only the human summary
        #[arg(long)]
        json: bool,

        /// Write JSON output to file (overrides [output] json)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Similarity threshold, overriding the config value
        #[arg(long)]
        threshold: Option<f64>,
    },

    /// Validate a cluster config without running
    #[command(after_help = "\
Examples:
  rowcol validate restaurants.cluster.toml")]
    Validate {
        /// Path to the .cluster.toml config file
        config: PathBuf,
    },
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nengine:  rowcol-clustering ", env!("CARGO_PKG_VERSION"),
    )
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Run { config, json, output, threshold } => {
            cluster::cmd_run(config, json, output, threshold)
        }
        Commands::Validate { config } => cluster::cmd_validate(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}
