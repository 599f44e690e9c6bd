//! Merkle trees and the proofs they emit
//!
//! This module builds trees over opaque leaves, creates audit and size proofs,
//! and rebuilds proofs into a root hash for verification.

pub mod factory;
pub mod merkle;
pub mod proof;
pub mod size_proof;

// Re-export commonly used items
pub use factory::{build_digest_provider, build_tree, MerkleTreeFactory};
pub use merkle::{node_height, tree_depth, MerkleTree, PARALLEL_HASH_THRESHOLD};
pub use proof::{MerkleProof, ProofType};
pub use size_proof::verify_size_proof;
