//! Integration tests for the storefront SDK
//!
//! This crate drives the client against wiremock servers covering:
//! - Envelope shape for every verb
//! - Credential injection and 401 teardown
//! - Resource routes and their paths, queries and bodies

pub mod helpers;
pub mod mock_storefront;

// Re-export commonly used items
pub use helpers::*;
pub use mock_storefront::*;

#[cfg(test)]
mod gateway_tests;
