//! Login and logout commands.

use anyhow::Result;
use clap::Args;
use serde_json::{json, Value};
use std::process::ExitCode;
use storefront_sdk::{Envelope, Error};

use crate::cli::Context;
use crate::output::{self, OutputFormat};

/// Arguments for the login command.
#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account email
    #[arg(short, long)]
    pub email: String,

    /// Account password
    #[arg(short, long, env = "STOREFRONT_PASSWORD", hide_env_values = true)]
    pub password: String,
}

/// Token field in a login response, if any.
pub fn token_from(data: &Value) -> Option<&str> {
    ["token", "accessToken"]
        .iter()
        .find_map(|key| data.get(key).and_then(Value::as_str))
        .filter(|token| !token.is_empty())
}

/// Execute the login command.
pub async fn execute(args: LoginArgs, ctx: &Context) -> Result<ExitCode> {
    let client = ctx.client()?;
    let credentials = json!({ "email": args.email, "password": args.password });
    let envelope = client.auth().login(&credentials).await;

    if envelope.is_success() {
        match envelope.data().and_then(token_from) {
            Some(token) => {
                if let Err(e) = ctx.store.try_set(token) {
                    output::error(&format!(
                        "Signed in, but the token could not be saved to {}: {}",
                        ctx.token_file.display(),
                        e
                    ));
                    return Ok(ExitCode::FAILURE);
                }
                tracing::debug!(path = %ctx.token_file.display(), "Stored session token");
            }
            None => {
                output::warning("Login succeeded but the response carried no token");
            }
        }
    }

    match ctx.format {
        OutputFormat::Json => output::envelope(&envelope, ctx.format),
        OutputFormat::Text if envelope.is_success() => {
            output::success(&format!("Signed in as {}", args.email));
            Ok(ExitCode::SUCCESS)
        }
        OutputFormat::Text => output::envelope(&envelope, ctx.format),
    }
}

/// Sign out on the server, then forget the local token either way.
pub async fn logout(ctx: &Context) -> Result<ExitCode> {
    let envelope = if ctx.session.is_authenticated() {
        match ctx.client() {
            Ok(client) => client.auth().logout().await,
            Err(e) => Envelope::failure(&Error::configuration(format!("{:#}", e))),
        }
    } else {
        Envelope::success_with_message(Value::Null, "Not signed in")
    };
    ctx.session.sign_out();

    match ctx.format {
        OutputFormat::Json => {
            output::json(&envelope)?;
        }
        OutputFormat::Text => {
            if !envelope.is_success() {
                output::warning(&format!("Server logout failed: {}", envelope.message()));
            }
            output::success("Signed out");
        }
    }

    Ok(ExitCode::SUCCESS)
}
