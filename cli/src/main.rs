//! # PackRS Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! Entry point for the PackRS CLI, which packages a built application into a
//! deployable `app.zip` for serverless runtimes. It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Routing execution to the command handlers
//!
//! ## Examples
//!
//! ```bash
//! # Get help
//! packrs --help
//!
//! # Package the current directory with debug logging
//! packrs -vv package
//! ```
//!
//! Errors from every command propagate up to here, are printed as
//! `Error: <message>` and end the process with exit code 1.
//!
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod commands; // Command handlers (package)
mod common; // Shared utilities (archive, fs, process, ...)
mod core; // Configuration and errors

/// Top-level command-line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "packrs",
    about = "PackRS: Package applications for serverless deployment",
    long_about = "Compresses a built application tree into app.zip, preserving Unix\n\
                  permissions and enforcing the 250MB uncompressed size limit.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

/// Available top-level commands.
#[derive(Parser, Debug)]
enum Commands {
    #[command(alias = "p")]
    Package(commands::package::PackageArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let command_result = match cli.command {
        Commands::Package(args) => commands::package::handle_package(args).await,
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
