//! Terminal stand-in for the browser's login redirect.

use storefront_sdk::Navigator;

use crate::output;

/// Tells the user to sign in again when the API rejects the session.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn navigate(&self, path: &str) {
        output::warning(&format!(
            "Session expired ({}). Sign in again with `storefront login`.",
            path
        ));
    }
}
