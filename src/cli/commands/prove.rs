//! Prove command implementation

use crate::cli::{read_leaves, write_output, DigestArgs};
use crate::proofs::build_tree;
use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;

/// Execute the prove command
pub fn execute(
    leaves: Vec<PathBuf>,
    indices: Vec<usize>,
    output: Option<PathBuf>,
    digest: &DigestArgs,
    quiet: bool,
) -> Result<()> {
    let config = digest.resolve()?;
    let provider = config.build_provider()?;
    let tree = build_tree(read_leaves(&leaves)?, provider)?;
    let proof = tree.create_audit_proof(&indices)?;

    write_output(output.as_deref(), &proof.to_json()?)?;

    if !quiet {
        eprintln!(
            "{} audit proof for {} of {} leaves, {} sibling hashes",
            "✓".green(),
            proof.leaves().len(),
            tree.leaf_count(),
            proof.hashes().len()
        );
        eprintln!("  Root: {}", tree.root().to_string().cyan());
    }
    Ok(())
}
