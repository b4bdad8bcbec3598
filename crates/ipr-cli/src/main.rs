//! IPR CLI - Main entry point

use clap::Parser;
use ipr_cli::Cli;
use ipr_common::logging::{init_logging, LogConfig, LogLevel, LogOutput};
use std::process;
use tracing::error;

#[tokio::main]
async fn main() {
    // Load .env before anything reads the environment
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Verbose mode logs debug output; otherwise only warnings reach the console
    let defaults = LogConfig::builder()
        .level(if cli.verbose {
            LogLevel::Debug
        } else {
            LogLevel::Warn
        })
        .output(LogOutput::Console)
        .log_file_prefix("ipr")
        .build();

    // Environment variables take precedence
    let log_config = defaults.clone().with_env_overrides().unwrap_or(defaults);

    // The CLI works without logging
    let guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Warning: logging disabled: {:#}", e);
            None
        },
    };

    let code = match ipr_cli::run(cli).await {
        Ok(completion) => completion.exit_code(),
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("Error: {}", e);
            e.exit_code()
        },
    };

    // Flush file logs before exiting
    drop(guard);
    process::exit(code);
}
