mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tailsift_core::logging::{LogMode, default_log_mode, init_logging};

const DEFAULT_CONFIG: &str = "config/tailsift.toml";

#[derive(Parser, Debug)]
#[command(
    name = "tailsift",
    version,
    about = "Tailsift: access-log ingestion, enrichment and replay"
)]
struct Cli {
    /// Log output format; picked from the terminal when omitted
    #[arg(long, value_enum, global = true)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import the backlog, then tail live logs until Ctrl-C or SIGTERM (default)
    Run {
        #[arg(long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,
    },

    /// Import the backlog and exit
    Import {
        #[arg(long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,

        /// Process into memory instead of the configured store
        #[arg(long)]
        dry_run: bool,

        /// Print the import report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Classify a user agent and print the result as JSON
    Classify {
        user_agent: String,

        /// Extra signature files, applied in order over the built-in set
        #[arg(long = "signatures")]
        signature_files: Vec<PathBuf>,
    },

    /// Validate a config file and exit
    Check {
        #[arg(default_value = DEFAULT_CONFIG)]
        config: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogFormat {
    Json,
    Pretty,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mode = match cli.log_format {
        Some(LogFormat::Json) => LogMode::Json,
        Some(LogFormat::Pretty) => LogMode::Pretty,
        None => default_log_mode(),
    };

    let command = cli.command.unwrap_or(Command::Run {
        config: PathBuf::from(DEFAULT_CONFIG),
    });

    match command {
        Command::Run { config } => {
            init_logging(mode);
            cli::run::run(config).await
        }
        Command::Import {
            config,
            dry_run,
            json,
        } => {
            init_logging(mode);
            cli::import::import(config, dry_run, json).await
        }
        Command::Classify {
            user_agent,
            signature_files,
        } => cli::classify::classify(&user_agent, &signature_files),
        Command::Check { config } => cli::check::check(config),
    }
}
