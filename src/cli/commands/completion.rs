use crate::cli::Cli;
use anyhow::Result;
use clap::CommandFactory;
use clap_complete::{generate, Shell};
use colored::Colorize;
use std::io;

/// Generate shell completion scripts
pub fn execute(shell: Shell) -> Result<()> {
    let mut cmd = Cli::command();
    let bin_name = "merkle";

    generate(shell, &mut cmd, bin_name, &mut io::stdout());

    eprintln!("{}", "Installation Instructions:".bold());
    match shell {
        Shell::Bash => {
            eprintln!("  Add the following to your ~/.bashrc or ~/.bash_profile:");
            eprintln!("  {}", "eval \"$(merkle completion bash)\"".cyan());
        },
        Shell::Zsh => {
            eprintln!("  Add the following to your ~/.zshrc:");
            eprintln!("  {}", "eval \"$(merkle completion zsh)\"".cyan());
        },
        Shell::Fish => {
            eprintln!("  Save to your fish completions directory:");
            eprintln!(
                "  {}",
                "merkle completion fish > ~/.config/fish/completions/merkle.fish".cyan()
            );
        },
        _ => {
            eprintln!("  Consult your shell's documentation for loading completion scripts.");
        },
    }

    Ok(())
}
