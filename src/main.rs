//! kafka-check-tools - Main Entry Point

use clap::Parser;
use kafka_check_tools::cli::{Cli, Commands};
use kafka_check_tools::commands::{completion, consumer, producer};
use kafka_check_tools::observability::init_default_logging;
use std::process::ExitCode;
use tracing::error;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_default_logging();

    let result = match cli.command {
        Commands::Producer(args) => producer::run(&args).await,
        Commands::Consumer(args) => consumer::run(&args, consumer::shutdown_on_interrupt()).await,
        Commands::Completion { shell } => {
            completion::write_completions(shell, &mut std::io::stdout());
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
