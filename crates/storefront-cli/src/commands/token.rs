//! Token command - inspect or change the stored session token.

use anyhow::Result;
use clap::{Args, Subcommand};
use serde_json::json;
use std::process::ExitCode;
use storefront_sdk::ExposeSecret;

use crate::cli::Context;
use crate::output::{self, OutputFormat};

/// Arguments for the token command.
#[derive(Args, Debug)]
pub struct TokenArgs {
    #[command(subcommand)]
    pub action: TokenAction,
}

#[derive(Subcommand, Debug)]
pub enum TokenAction {
    /// Show the stored token (masked)
    Show {
        /// Print the full token
        #[arg(long)]
        reveal: bool,
    },

    /// Store a token obtained elsewhere
    Set {
        /// Bearer token value
        token: String,
    },

    /// Remove the stored token
    Clear,
}

/// Execute the token command.
pub fn execute(args: TokenArgs, ctx: &Context) -> Result<ExitCode> {
    match args.action {
        TokenAction::Show { reveal } => show(ctx, reveal),
        TokenAction::Set { token } => {
            let token = token.trim();
            if token.is_empty() {
                output::error("Token must not be empty");
                return Ok(ExitCode::FAILURE);
            }
            match ctx.store.try_set(token) {
                Ok(()) => {
                    output::success(&format!("Token stored in {}", ctx.token_file.display()));
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    output::error(&format!(
                        "Could not store token in {}: {}",
                        ctx.token_file.display(),
                        e
                    ));
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        TokenAction::Clear => {
            ctx.session.sign_out();
            output::success("Token cleared");
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn show(ctx: &Context, reveal: bool) -> Result<ExitCode> {
    let token = ctx.session.bearer();
    let display = token.as_ref().map(|t| {
        let raw = t.expose_secret();
        if reveal {
            raw.to_string()
        } else {
            output::mask(raw)
        }
    });

    match ctx.format {
        OutputFormat::Json => output::json(&json!({
            "path": ctx.token_file.display().to_string(),
            "authenticated": token.is_some(),
            "token": display,
        }))?,
        OutputFormat::Text => {
            output::key_value("Path", &ctx.token_file.display().to_string());
            output::key_value("Token", display.as_deref().unwrap_or("(none)"));
        }
    }

    Ok(output::exit_code(token.is_some()))
}
