//! Command-line interface for merkle_digest

use crate::config::DigestConfig;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::{Path, PathBuf};

pub mod commands;

/// merkle - build Merkle trees over files and create or check proofs
#[derive(Parser)]
#[command(
    name = "merkle",
    version,
    about = "Build Merkle trees over files and create or verify audit and size proofs",
    long_about = "Each leaf file becomes one tree leaf, in argument order. Trees are hashed with a \
                  pluggable digest provider selected by algorithm, variant and options."
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(flatten)]
    pub digest: DigestArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Digest provider selection, layered over an optional TOML config file
#[derive(Args, Debug, Clone, Default)]
pub struct DigestArgs {
    /// Digest configuration file (TOML)
    #[arg(long, global = true, env = "MERKLE_DIGEST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Base hash algorithm, e.g. SHA-256
    #[arg(long, global = true)]
    pub algorithm: Option<String>,

    /// Digest provider variant, e.g. NonceHashDigestProviderVerify
    #[arg(long, global = true)]
    pub variant: Option<String>,

    /// Leaf prefix for the tweakable provider (hex)
    #[arg(long, global = true)]
    pub leaf_prefix: Option<String>,

    /// Node prefix for the tweakable provider (hex)
    #[arg(long, global = true)]
    pub node_prefix: Option<String>,

    /// Nonce secret for nonce providers (hex)
    #[arg(long, global = true)]
    pub entropy: Option<String>,

    /// Length of randomly drawn entropy for the nonce provider, in bytes
    #[arg(long, global = true)]
    pub entropy_length: Option<u64>,
}

impl DigestArgs {
    /// Config file values, overridden by any flag given on the command line
    pub fn resolve(&self) -> Result<DigestConfig> {
        let mut config = match &self.config {
            Some(path) => DigestConfig::load(path)
                .with_context(|| format!("Failed to load digest config {}", path.display()))?,
            None => DigestConfig::default(),
        };

        if let Some(algorithm) = &self.algorithm {
            config.algorithm = algorithm.clone();
        }
        if let Some(variant) = &self.variant {
            config.variant = variant.clone();
        }
        if self.leaf_prefix.is_some() {
            config.options.leaf_prefix = self.leaf_prefix.clone();
        }
        if self.node_prefix.is_some() {
            config.options.node_prefix = self.node_prefix.clone();
        }
        if self.entropy.is_some() {
            config.options.entropy = self.entropy.clone();
        }
        if self.entropy_length.is_some() {
            config.options.entropy_length = self.entropy_length;
        }
        Ok(config)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the root hash of a tree over the leaf files
    Root {
        /// Leaf files, in leaf order
        leaves: Vec<PathBuf>,
    },

    /// Create an audit proof revealing some of the leaves
    Prove {
        /// Leaf files, in leaf order
        #[arg(required = true)]
        leaves: Vec<PathBuf>,

        /// Leaf indices to reveal
        #[arg(short, long, value_delimiter = ',', required = true)]
        indices: Vec<usize>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Create a size proof revealing only the leaf count (nonce variants only)
    SizeProof {
        /// Leaf files, in leaf order
        leaves: Vec<PathBuf>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Verify a proof file against a root hash
    Verify {
        /// Proof file (JSON)
        proof: PathBuf,

        /// Expected root, as ALGORITHM:HEX
        #[arg(short, long)]
        root: String,

        /// Expected leaf count (size proofs)
        #[arg(long)]
        leaf_count: Option<usize>,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Read every leaf file into memory, in order
pub fn read_leaves(paths: &[PathBuf]) -> Result<Vec<Vec<u8>>> {
    paths
        .iter()
        .map(|path| {
            std::fs::read(path)
                .with_context(|| format!("Failed to read leaf file {}", path.display()))
        })
        .collect()
}

/// Write to a file, or stdout when no path is given
pub fn write_output(output: Option<&Path>, content: &str) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            println!("{}", content);
            Ok(())
        }
    }
}
