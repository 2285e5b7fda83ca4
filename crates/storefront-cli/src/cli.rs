//! CLI argument definitions using clap.

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use storefront_sdk::{Client, FileCredentialStore, Session, TOKEN_KEY};

use crate::commands;
use crate::output::OutputFormat;
use crate::terminal::TerminalNavigator;

/// Storefront - call the storefront API from a terminal
#[derive(Parser, Debug)]
#[command(name = "storefront")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// API base URL [default: $STOREFRONT_API_BASE_URL, else https://api.example.com]
    #[arg(short = 'u', long, global = true)]
    pub url: Option<String>,

    /// File holding the session token
    #[arg(long, env = "STOREFRONT_TOKEN_FILE", global = true)]
    pub token_file: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, default_value = "10", global = true)]
    pub timeout: u64,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the API routes
    Routes(commands::routes::RoutesArgs),

    /// Call a named route
    Call(commands::call::CallArgs),

    /// Send a raw request
    Request(commands::request::RequestArgs),

    /// Sign in and store the session token
    Login(commands::login::LoginArgs),

    /// Sign out and forget the session token
    Logout,

    /// Inspect or change the stored session token
    Token(commands::token::TokenArgs),

    /// Generate shell completions
    Completions(commands::completions::CompletionsArgs),
}

/// Shared state handed to every command.
#[derive(Debug)]
pub struct Context {
    pub format: OutputFormat,
    pub session: Session,
    pub store: Arc<FileCredentialStore>,
    pub token_file: PathBuf,
    url: Option<String>,
    timeout: Duration,
}

impl Context {
    /// Build the API client for this invocation.
    ///
    /// Without `--url` the SDK resolves the base URL from the environment,
    /// falling back to its default when the variable is unset or invalid.
    pub fn client(&self) -> Result<Client> {
        let mut builder = Client::builder()
            .timeout(self.timeout)
            .session(self.session.clone());
        if let Some(url) = &self.url {
            builder = builder.base_url(url);
        }
        builder.build().context("Failed to create API client")
    }
}

impl Cli {
    /// Execute the CLI command.
    pub async fn execute(self) -> Result<ExitCode> {
        let token_file = self.token_file.clone().unwrap_or_else(default_token_file);
        let store = Arc::new(FileCredentialStore::new(&token_file));
        let ctx = Context {
            format: OutputFormat::from_json_flag(self.json),
            session: Session::new(store.clone(), Arc::new(TerminalNavigator)),
            store,
            token_file,
            url: self.url,
            timeout: Duration::from_secs(self.timeout),
        };

        match self.command {
            Commands::Routes(args) => commands::routes::execute(args, &ctx),
            Commands::Call(args) => commands::call::execute(args, &ctx).await,
            Commands::Request(args) => commands::request::execute(args, &ctx).await,
            Commands::Login(args) => commands::login::execute(args, &ctx).await,
            Commands::Logout => commands::login::logout(&ctx).await,
            Commands::Token(args) => commands::token::execute(args, &ctx),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

/// Token file under the platform config directory.
fn default_token_file() -> PathBuf {
    directories::ProjectDirs::from("com", "storefront", "storefront")
        .map(|dirs| dirs.config_dir().join(TOKEN_KEY))
        .unwrap_or_else(|| PathBuf::from(".storefront").join(TOKEN_KEY))
}

/// Parse a `key=value` argument.
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", s))?;
    if key.is_empty() {
        return Err(format!("empty key in '{}'", s));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Parse an optional JSON body argument.
pub fn parse_body(body: Option<&str>) -> Result<Option<serde_json::Value>> {
    body.map(|raw| serde_json::from_str(raw).context("--body is not valid JSON"))
        .transpose()
}
