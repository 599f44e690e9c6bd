//! merkle CLI
//!
//! Command-line front end for building Merkle trees over files and creating
//! and verifying audit and size proofs.

use anyhow::Result;
use clap::Parser;
use merkle_digest::cli::{self, Cli, Commands};

fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG wins over the verbosity flags
    let default_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    // Execute the command
    match cli.command {
        Commands::Root { leaves } => cli::commands::root::execute(leaves, &cli.digest, cli.json),
        Commands::Prove {
            leaves,
            indices,
            output,
        } => cli::commands::prove::execute(leaves, indices, output, &cli.digest, cli.quiet),
        Commands::SizeProof { leaves, output } => {
            cli::commands::size_proof::execute(leaves, output, &cli.digest, cli.quiet)
        },
        Commands::Verify {
            proof,
            root,
            leaf_count,
        } => cli::commands::verify::execute(proof, root, leaf_count, &cli.digest, cli.json),
        Commands::Completion { shell } => cli::commands::completion::execute(shell),
    }
}
