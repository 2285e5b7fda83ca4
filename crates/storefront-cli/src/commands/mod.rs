//! CLI commands module.

pub mod call;
pub mod completions;
pub mod login;
pub mod request;
pub mod routes;
pub mod token;
