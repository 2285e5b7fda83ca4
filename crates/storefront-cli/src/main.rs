//! Storefront CLI
//!
//! Command-line interface for calling the storefront API.

use clap::Parser;
use serde_json::json;
use std::process::ExitCode;

mod cli;
mod commands;
mod output;
mod terminal;

use cli::Cli;
use output::OutputFormat;

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let format = OutputFormat::from_json_flag(cli.json);

    init_tracing(cli.verbose, cli.json);

    match cli.execute().await {
        Ok(code) => code,
        Err(e) => {
            report(&e, format);
            ExitCode::FAILURE
        }
    }
}

/// Print an error that stopped a command before it produced an envelope.
fn report(error: &anyhow::Error, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let failure = json!({ "success": false, "message": format!("{:#}", error) });
            if output::json(&failure).is_err() {
                output::error(&format!("{:#}", error));
            }
        }
        OutputFormat::Text => output::error(&format!("{:#}", error)),
    }
}

/// Log directives for a verbosity level.
///
/// `-v` flags raise the storefront crates only; the HTTP stack stays at
/// `warn` until `-vvv`. `RUST_LOG` replaces these directives when set.
fn filter_directives(verbose: u8) -> String {
    let (ours, deps) = match verbose {
        0 => ("warn", "warn"),
        1 => ("info", "warn"),
        2 => ("debug", "warn"),
        _ => ("trace", "debug"),
    };
    format!("{deps},storefront_sdk={ours},storefront_cli={ours}")
}

/// Initialize tracing on stderr so stdout stays machine-readable.
fn init_tracing(verbose: u8, json: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(verbose)));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(fmt::layer().with_target(verbose > 1).with_writer(std::io::stderr))
            .init();
    }
}
