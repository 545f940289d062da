//! Folio - portfolio document server
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use folio::cli::{Cli, Commands, LogFormat};
use folio::config::ConfigManager;
use folio::error::FolioResult;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> FolioResult<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.log_format);

    let config_manager = if let Some(ref path) = cli.config {
        ConfigManager::with_path(path.clone())
    } else {
        ConfigManager::new()
    };
    let config = config_manager.load().await?;

    match cli.command {
        Commands::Serve(args) => folio::cli::commands::serve(args, &config).await,
        Commands::Config(args) => {
            folio::cli::commands::config(args, &config_manager, &config).await
        }
    }
}

/// Initialize logging: 0 = info, 1 = debug, 2+ = trace
fn init_logging(verbose: u8, format: LogFormat) {
    let filter = match verbose {
        0 => EnvFilter::new("folio=info,tower_http=warn"),
        1 => EnvFilter::new("folio=debug,tower_http=debug"),
        _ => EnvFilter::new("folio=trace,tower_http=trace"),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => builder.with_target(false).init(),
        LogFormat::Json => builder.json().init(),
    }
}
