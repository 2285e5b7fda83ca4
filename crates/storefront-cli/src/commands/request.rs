//! Request command - send a raw request to any path.

use anyhow::Result;
use clap::Args;
use std::process::ExitCode;
use storefront_sdk::{EndpointCall, RequestOptions, Verb};

use crate::cli::{parse_body, parse_key_val, Context};
use crate::output::{self, OutputFormat};

/// Arguments for the request command.
#[derive(Args, Debug)]
pub struct RequestArgs {
    /// HTTP method (GET, POST, PUT, PATCH, DELETE)
    pub method: Verb,

    /// Path relative to the API base URL
    pub path: String,

    /// Query parameter as key=value (repeatable)
    #[arg(short = 'q', long = "query", value_parser = parse_key_val)]
    pub query: Vec<(String, String)>,

    /// Extra header as name=value (repeatable)
    #[arg(short = 'H', long = "header", value_parser = parse_key_val)]
    pub headers: Vec<(String, String)>,

    /// JSON request body
    #[arg(short, long)]
    pub body: Option<String>,
}

/// Execute the request command.
pub async fn execute(args: RequestArgs, ctx: &Context) -> Result<ExitCode> {
    let body = parse_body(args.body.as_deref())?;
    let client = ctx.client()?;

    let mut options = RequestOptions::new().params(args.query);
    for (name, value) in args.headers {
        options = options.header(name, value);
    }

    let mut call = EndpointCall::new(args.method, args.path).with_options(options);
    if let Some(body) = body {
        call = call.with_body(body);
    }

    let envelope = if ctx.format == OutputFormat::Text {
        let spinner = output::spinner(&format!("{} {}", call.verb, call.path));
        let envelope = client.call(call).await;
        spinner.finish_and_clear();
        envelope
    } else {
        client.call(call).await
    };

    output::envelope(&envelope, ctx.format)
}
