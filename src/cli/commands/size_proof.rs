//! Size proof command implementation

use crate::cli::{read_leaves, write_output, DigestArgs};
use crate::proofs::build_tree;
use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;

/// Execute the size-proof command
pub fn execute(
    leaves: Vec<PathBuf>,
    output: Option<PathBuf>,
    digest: &DigestArgs,
    quiet: bool,
) -> Result<()> {
    let config = digest.resolve()?;
    let provider = config.build_provider()?;
    let tree = build_tree(read_leaves(&leaves)?, provider)?;
    let proof = tree.size_proof()?;

    write_output(output.as_deref(), &proof.to_json()?)?;

    if !quiet {
        eprintln!("{} size proof for {} leaves", "✓".green(), tree.leaf_count());
        eprintln!("  Root: {}", tree.root().to_string().cyan());
    }
    Ok(())
}
