//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `geoiplookup` library that handles:
//! - Environment variable loading (.env file)
//! - Command-line argument parsing
//! - Logger initialization
//! - User-facing output and exit status
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use std::process;

use geoiplookup::config::LICENSE_KEY_ENV;
use geoiplookup::initialization::{init_logger_with, load_dotenv, LogTarget};
use geoiplookup::{run_lookup, run_update, Cli};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // .env may provide LICENSEKEY, so load it before building the config
    load_dotenv();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Help and version also exit 1, like any run that did no lookup
            if e.kind() == ErrorKind::DisplayVersion {
                println!("Version: {}", env!("CARGO_PKG_VERSION"));
            } else {
                let _ = e.print();
            }
            process::exit(1);
        }
    };

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let is_update = cli.is_update();
    let target = cli.target.clone();
    let config = cli.into_config(std::env::var(LICENSE_KEY_ENV).ok());

    let log_target = if config.verbose {
        LogTarget::Stdout
    } else {
        LogTarget::Stderr
    };
    init_logger_with(config.log_level(), config.log_format, log_target)
        .context("Failed to initialize logger")?;

    if is_update {
        run_update(&config).await?;
    } else {
        let line = run_lookup(&config, &target).await?;
        println!("{}", line);
    }
    Ok(())
}
