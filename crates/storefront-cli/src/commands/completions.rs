//! Shell completions command.

use anyhow::{bail, Result};
use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};
use std::io;
use std::process::ExitCode;

use crate::cli::Cli;

/// Arguments for the completions command.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for (defaults to $SHELL)
    #[arg(value_enum)]
    pub shell: Option<Shell>,
}

/// Execute the completions command.
pub fn execute(args: CompletionsArgs) -> Result<ExitCode> {
    let Some(shell) = args.shell.or_else(Shell::from_env) else {
        bail!("Could not detect the shell from $SHELL; pass one, e.g. `completions zsh`");
    };

    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "storefront", &mut io::stdout());

    Ok(ExitCode::SUCCESS)
}
