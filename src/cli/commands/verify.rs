//! Verify command implementation

use crate::cli::DigestArgs;
use crate::core::types::HashValue;
use crate::proofs::{verify_size_proof, MerkleProof, ProofType};
use anyhow::{bail, Context, Result};
use colored::Colorize;
use serde_json::json;
use std::path::PathBuf;

/// Execute the verify command
pub fn execute(
    proof_path: PathBuf,
    root: String,
    leaf_count: Option<usize>,
    digest: &DigestArgs,
    as_json: bool,
) -> Result<()> {
    let content = std::fs::read_to_string(&proof_path)
        .with_context(|| format!("Failed to read proof {}", proof_path.display()))?;
    let proof = MerkleProof::from_json(&content)?;
    let expected: HashValue = root.parse()?;

    let verified = match proof.proof_type() {
        ProofType::Size => verify_size_proof(&proof, &expected, leaf_count)?,
        ProofType::Audit => {
            let provider = digest.resolve()?.build_provider()?;
            let count_matches = leaf_count.map_or(true, |count| count == proof.tree_size());
            count_matches && proof.verify(&expected, provider.as_ref())?
        }
    };

    if as_json {
        println!(
            "{}",
            json!({
                "verified": verified,
                "proof_type": proof.proof_type(),
                "tree_size": proof.tree_size(),
                "revealed_leaves": proof.leaves().iter().map(|leaf| leaf.index).collect::<Vec<_>>(),
            })
        );
    }

    if !verified {
        bail!("Proof does not match root {}", expected);
    }

    if !as_json {
        println!("{} Proof verified against {}", "✓".green(), expected.to_string().cyan());
    }
    Ok(())
}
