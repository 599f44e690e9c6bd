//! Root command implementation

use crate::cli::{read_leaves, DigestArgs};
use crate::proofs::build_tree;
use anyhow::Result;
use colored::Colorize;
use serde_json::json;
use std::path::PathBuf;

/// Execute the root command
pub fn execute(leaves: Vec<PathBuf>, digest: &DigestArgs, as_json: bool) -> Result<()> {
    let config = digest.resolve()?;
    let provider = config.build_provider()?;
    let tree = build_tree(read_leaves(&leaves)?, provider)?;

    if as_json {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "root": tree.root(),
                "leaf_count": tree.leaf_count(),
                "depth": tree.depth(),
                "algorithm": tree.root().algorithm(),
                "variant": tree.digest().variant(),
            }))?
        );
    } else {
        println!("{}", tree.root());
        tracing::info!(
            "{} leaves, depth {}, {}",
            tree.leaf_count(),
            tree.depth(),
            tree.digest().variant().to_string().cyan()
        );
    }

    Ok(())
}
