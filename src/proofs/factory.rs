//! Central construction point for digest providers and trees

use crate::core::error::Result;
use crate::hashing::{HashDigest, HashDigestOptions, HashDigestProvider};
use crate::proofs::merkle::MerkleTree;
use std::sync::Arc;

/// Builds digest providers by name and trees from leaves
#[derive(Debug, Clone, Copy, Default)]
pub struct MerkleTreeFactory;

impl MerkleTreeFactory {
    pub fn new() -> Self {
        Self
    }

    /// Resolve `(algorithm, variant, options)` into a ready provider.
    ///
    /// Unknown or banned algorithms, unknown variants and missing or ill-typed
    /// options all fail here, never later while hashing.
    pub fn create_hash_digest_provider(
        &self,
        algorithm_name: &str,
        variant_name: &str,
        options: HashDigestOptions,
    ) -> Result<Arc<HashDigestProvider>> {
        let digest = HashDigest::new(algorithm_name, variant_name, options)?;
        Ok(Arc::new(HashDigestProvider::from_digest(&digest)?))
    }

    pub fn create_tree(
        &self,
        leaves: Vec<Vec<u8>>,
        digest: Arc<HashDigestProvider>,
    ) -> Result<MerkleTree> {
        MerkleTree::new(leaves, digest)
    }
}

/// Shorthand for [`MerkleTreeFactory::create_hash_digest_provider`]
pub fn build_digest_provider(
    algorithm_name: &str,
    variant_name: &str,
    options: HashDigestOptions,
) -> Result<Arc<HashDigestProvider>> {
    MerkleTreeFactory.create_hash_digest_provider(algorithm_name, variant_name, options)
}

/// Shorthand for [`MerkleTreeFactory::create_tree`]
pub fn build_tree(leaves: Vec<Vec<u8>>, digest: Arc<HashDigestProvider>) -> Result<MerkleTree> {
    MerkleTreeFactory.create_tree(leaves, digest)
}
