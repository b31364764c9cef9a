//! CLI application for Italian business document extraction.

mod commands;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use console::style;
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

use estrai_core::{ErrorClass, EstraiError};

use commands::{batch, config, process};

/// Extract company fields from Italian registry extracts, financial
/// statements and tax returns
#[derive(Parser)]
#[command(name = "estrai")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a single document
    Process(process::ProcessArgs),

    /// Process multiple documents
    Batch(batch::BatchArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    // Logs go to stderr, stdout carries the extracted record
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to install logger: {}", e);
    }

    let outcome = match cli.command {
        Commands::Process(args) => process::run(args, cli.config.as_deref()).await,
        Commands::Batch(args) => batch::run(args, cli.config.as_deref()).await,
        Commands::Config(args) => config::run(args).await,
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report(&e),
    }
}

/// Print the failure and map it to an exit code: 2 for bad input, 3 for
/// documents without a text layer, 1 for anything else.
fn report(err: &anyhow::Error) -> ExitCode {
    let class = err
        .downcast_ref::<EstraiError>()
        .map(EstraiError::class)
        .unwrap_or(ErrorClass::Internal);

    match class {
        ErrorClass::Input => {
            eprintln!("{} {:#}", style("error:").red(), err);
            ExitCode::from(2)
        }
        ErrorClass::UnsupportedDocument => {
            eprintln!("{} {:#}", style("error:").red(), err);
            ExitCode::from(3)
        }
        ErrorClass::Internal => {
            error!("{:#}", err);
            eprintln!(
                "{} processing failed (run with -v for details)",
                style("error:").red()
            );
            ExitCode::from(1)
        }
    }
}
