//! docsift: inspect, validate and search documentation search indices.

mod cli;
mod commands;
mod error;

use std::process::ExitCode;

use clap::Parser;
use docsift_config::Config;
use exn::ResultExt;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::error::{ErrorKind, Result};

/// Exit code for anything that stopped a command from completing.
const FAILURE: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match execute(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err:?}");
            ExitCode::from(FAILURE)
        },
    }
}

fn execute(cli: &Cli) -> Result<ExitCode> {
    let config = Config::load(cli.config.as_deref()).or_raise(|| ErrorKind::Config)?;
    tracing::debug!(?config, "configuration loaded");
    let mut stdout = std::io::stdout().lock();
    commands::run(cli, &config, &mut stdout)
}

/// Logs go to stderr so stdout stays parseable; `RUST_LOG` overrides `-v`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}
