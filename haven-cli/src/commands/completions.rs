//! Shell completion generation command.
//!
//! This module provides the `completions` command which generates shell completion
//! scripts for bash, zsh, fish, and PowerShell.

use crate::cli::Cli;
use crate::error::CliError;
use crate::utils::GlobalOptions;
use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};
use std::io;

/// Name of the installed binary.
const BIN_NAME: &str = "haven";

/// Generate shell completion scripts
#[derive(Args)]
pub struct CompletionsCommand {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CompletionsCommand {
    /// Execute the completions command.
    pub fn execute(&self, global: &GlobalOptions) -> Result<(), CliError> {
        let mut cmd = Cli::command();

        if !global.quiet {
            match self.shell {
                Shell::Bash => {
                    eprintln!("# Install with:");
                    eprintln!(
                        "#   haven completions bash > ~/.local/share/bash-completion/completions/haven"
                    );
                }
                Shell::Zsh => {
                    eprintln!("# Install with:");
                    eprintln!("#   haven completions zsh > ~/.zsh/completions/_haven");
                }
                Shell::Fish => {
                    eprintln!("# Install with:");
                    eprintln!("#   haven completions fish > ~/.config/fish/completions/haven.fish");
                }
                _ => {}
            }
        }

        generate(self.shell, &mut cmd, BIN_NAME, &mut io::stdout());

        Ok(())
    }
}
