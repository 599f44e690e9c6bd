//! merkle_digest - pluggable, authenticated Merkle trees
//!
//! Trees are built over opaque byte leaves with a hash digest provider chosen
//! by name: a base algorithm (SHA-224/256/384/512), a provider variant and a
//! small option map. Providers add domain separation between leaves and inner
//! nodes, optional per-leaf nonces derived from a secret, or caller-chosen
//! prefixes.
//!
//! # Core Features
//!
//! - **Pluggable digests**: default, nonce, nonce-verify, size-only-verify and tweakable providers
//! - **Audit proofs**: reveal any subset of leaves and prove they belong to the root
//! - **Size proofs**: prove the leaf count of a nonce tree without revealing leaf content
//! - **Proof algebra**: take subsets of proofs and merge proofs against the same root
//!
//! # Example Usage
//!
//! ```rust
//! use merkle_digest::{build_digest_provider, build_tree, HashDigestOptions};
//!
//! let digest = build_digest_provider("SHA-256", "DefaultHashDigestProvider", HashDigestOptions::new())?;
//! let leaves: Vec<Vec<u8>> = vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()];
//! let tree = build_tree(leaves, digest.clone())?;
//!
//! let proof = tree.create_audit_proof(&[1])?;
//! assert!(proof.verify(tree.root(), digest.as_ref())?);
//! # Ok::<(), merkle_digest::MerkleError>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod hashing;
pub mod proofs;

// Re-export commonly used types
pub use crate::core::{
    error::{MerkleError, Result},
    hash::DigestAlgorithm,
    types::{HashValue, IndexedMerkleLeaf},
};
pub use config::DigestConfig;
pub use hashing::{
    DigestVariant, HashDigest, HashDigestOptions, HashDigestProvider, MerkleTreeHashDigest,
    OptionValue,
};
pub use proofs::{
    build_digest_provider, build_tree, verify_size_proof, MerkleProof, MerkleTree,
    MerkleTreeFactory, ProofType,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
