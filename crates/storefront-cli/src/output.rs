//! Output formatting utilities for the CLI.

use colored::Colorize;
use serde::Serialize;
use std::process::ExitCode;
use storefront_sdk::Envelope;

/// Output format for CLI results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// JSON output.
    Json,
}

impl OutputFormat {
    /// Create an output format from a JSON flag.
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            Self::Json
        } else {
            Self::Text
        }
    }
}

/// Print a success message.
pub fn success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print an error message.
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print a warning message.
pub fn warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow().bold(), message);
}

/// Print a key-value pair.
pub fn key_value(key: &str, value: &str) {
    println!("  {}: {}", key.bold(), value);
}

/// Print JSON output.
pub fn json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let output = serde_json::to_string_pretty(value)?;
    println!("{}", output);
    Ok(())
}

/// Create a spinner for requests in text mode.
pub fn spinner(message: &str) -> indicatif::ProgressBar {
    let spinner = indicatif::ProgressBar::new_spinner();
    let style = indicatif::ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
        .template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| indicatif::ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    spinner
}

/// Print a table of data.
pub fn table<T: tabled::Tabled>(data: &[T]) {
    use tabled::{settings::Style, Table};

    if data.is_empty() {
        println!("  (no data)");
        return;
    }

    let table = Table::new(data).with(Style::rounded()).to_string();
    println!("{}", table);
}

/// Print an envelope and map it to the process exit code.
pub fn envelope(envelope: &Envelope, format: OutputFormat) -> anyhow::Result<ExitCode> {
    match format {
        OutputFormat::Json => json(envelope)?,
        OutputFormat::Text if envelope.is_success() => {
            success(envelope.message());
            if let Some(data) = envelope.data().filter(|d| !d.is_null()) {
                println!("{}", serde_json::to_string_pretty(data)?);
            }
        }
        OutputFormat::Text => {
            match envelope.status_code() {
                Some(status) => error(&format!("{} (HTTP {})", envelope.message(), status)),
                None => error(envelope.message()),
            }
            if let Some(detail) = envelope.error() {
                eprintln!("{}", serde_json::to_string_pretty(detail)?);
            }
        }
    }

    Ok(exit_code(envelope.is_success()))
}

/// Exit code for a command outcome.
pub fn exit_code(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Mask a secret for display, keeping its first few characters.
pub fn mask(secret: &str) -> String {
    let len = secret.chars().count();
    if len <= 8 {
        return "*".repeat(len);
    }
    let visible: String = secret.chars().take(4).collect();
    format!("{}…({} chars)", visible, len)
}
