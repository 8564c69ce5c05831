// ABOUTME: Entry point for the copyid CLI application.
// ABOUTME: Parses arguments, runs one key installation, and maps the outcome to an exit code.

mod cli;

use clap::{CommandFactory, Parser};
use cli::Cli;
use copyid::config::CopyIdConfig;
use copyid::diagnostics::Diagnostics;
use copyid::install::copy_id;
use copyid::output::Output;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let Some(config) = cli.config() else {
        // Usage goes to stdout; a write failure changes nothing about the exit code
        let _ = Cli::command().print_help();
        std::process::exit(1);
    };

    let output = Output::new(cli.output_mode());

    if !run(&config, output).await {
        std::process::exit(1);
    }
}

/// Install the key and report the outcome. Returns whether it succeeded.
async fn run(config: &CopyIdConfig, mut output: Output) -> bool {
    let destination = config.destination();
    let mut diag = Diagnostics::default();

    output.start_timer();
    output.progress(&format!(
        "  → Copying public key to {} (port {})...",
        destination, config.port
    ));

    let result = copy_id(config, &mut diag).await;

    // Emit collected warnings
    for warning in diag.warnings() {
        output.warning(&warning.message);
    }

    match result {
        Ok(outcome) => {
            output.success(&outcome.describe(&destination));
            true
        }
        Err(e) => {
            output.failure(&e.describe(&destination));
            false
        }
    }
}
