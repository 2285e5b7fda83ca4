//! Routes command - list the API route table.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::process::ExitCode;
use storefront_sdk::routes::{Route, ROUTES};
use tabled::Tabled;

use crate::cli::Context;
use crate::output::{self, OutputFormat};

/// Arguments for the routes command.
#[derive(Args, Debug)]
pub struct RoutesArgs {
    /// Only show routes whose name starts with this resource (e.g. cart)
    #[arg(short, long)]
    pub resource: Option<String>,
}

/// One row of the route listing.
#[derive(Debug, Serialize, Tabled)]
pub struct RouteRow {
    #[tabled(rename = "Route")]
    pub name: String,
    #[tabled(rename = "Method")]
    pub method: String,
    #[tabled(rename = "Path")]
    pub path: String,
    #[tabled(rename = "Params")]
    pub params: String,
}

impl From<&Route> for RouteRow {
    fn from(route: &Route) -> Self {
        Self {
            name: route.name.to_string(),
            method: route.verb.to_string(),
            path: route.template.to_string(),
            params: route.params().join(", "),
        }
    }
}

/// Routes matching the optional resource filter.
pub fn select(resource: Option<&str>) -> Vec<RouteRow> {
    ROUTES
        .iter()
        .filter(|route| {
            resource.map_or(true, |r| {
                route
                    .name
                    .split_once('.')
                    .is_some_and(|(prefix, _)| prefix.eq_ignore_ascii_case(r))
            })
        })
        .map(RouteRow::from)
        .collect()
}

/// Execute the routes command.
pub fn execute(args: RoutesArgs, ctx: &Context) -> Result<ExitCode> {
    let rows = select(args.resource.as_deref());

    match ctx.format {
        OutputFormat::Json => output::json(&rows)?,
        OutputFormat::Text => output::table(&rows),
    }

    Ok(ExitCode::SUCCESS)
}
