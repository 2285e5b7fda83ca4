//! Call command - invoke a named route.

use anyhow::Result;
use clap::Args;
use std::process::ExitCode;
use storefront_sdk::{routes, Envelope};

use crate::cli::{parse_body, parse_key_val, Context};
use crate::output::{self, OutputFormat};

/// Arguments for the call command.
#[derive(Args, Debug)]
pub struct CallArgs {
    /// Route name, e.g. `products.get` (see `storefront routes`)
    pub route: String,

    /// Path parameter as key=value (repeatable)
    #[arg(short = 'p', long = "param", value_parser = parse_key_val)]
    pub params: Vec<(String, String)>,

    /// Query parameter as key=value (repeatable)
    #[arg(short = 'q', long = "query", value_parser = parse_key_val)]
    pub query: Vec<(String, String)>,

    /// JSON request body
    #[arg(short, long)]
    pub body: Option<String>,
}

/// Execute the call command.
pub async fn execute(args: CallArgs, ctx: &Context) -> Result<ExitCode> {
    let route = match routes::find(&args.route) {
        Ok(route) => route,
        Err(e) => return output::envelope(&Envelope::failure(&e), ctx.format),
    };
    let body = parse_body(args.body.as_deref())?;
    let client = ctx.client()?;

    let mut call = client.route(route);
    for (name, value) in args.params {
        call = call.param(name, value);
    }
    for (key, value) in args.query {
        call = call.query(key, value);
    }
    if let Some(body) = &body {
        call = call.body(body);
    }

    let envelope = if ctx.format == OutputFormat::Text {
        let spinner = output::spinner(&format!("{} {}", route.verb, route.template));
        let envelope = call.send().await;
        spinner.finish_and_clear();
        envelope
    } else {
        call.send().await
    };

    output::envelope(&envelope, ctx.format)
}
