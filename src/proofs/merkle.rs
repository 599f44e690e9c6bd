//! Merkle tree implementation
//!
//! Node hashes live in one flat vector; `layer_offsets[level]` is where each
//! layer starts, leaves at level 0 and the root alone in the last layer. An odd
//! layer pairs its last node with the digest's zero hash instead of duplicating it.
//!
//! Inner pairs are hashed with their height above the leaves. The root pair is
//! hashed with `leaf_count - 1` instead, so the root commits to the leaf count and
//! a proof cannot re-declare the size of the tree it came from.

use crate::core::{error::*, types::*};
use crate::hashing::{HashDigestProvider, MerkleTreeHashDigest};
use crate::proofs::proof::{MerkleProof, ProofType};
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Layers at least this wide are hashed on the rayon pool
pub const PARALLEL_HASH_THRESHOLD: usize = 1024;

/// Number of node layers above the leaves: `max(1, ceil(log2 leaf_count))`
pub fn tree_depth(leaf_count: usize) -> usize {
    if leaf_count <= 2 {
        1
    } else {
        (usize::BITS - (leaf_count - 1).leading_zeros()) as usize
    }
}

/// Depth argument for the `node_hash` calls that build layer `level + 1`
pub fn node_height(level: usize, leaf_count: usize) -> usize {
    if level + 1 == tree_depth(leaf_count) {
        leaf_count.saturating_sub(1)
    } else {
        level
    }
}

/// Merkle tree over opaque leaves
#[derive(Debug, Clone)]
pub struct MerkleTree {
    leaves: Vec<Vec<u8>>,
    digest: Arc<HashDigestProvider>,
    nodes: Vec<HashValue>,
    layer_offsets: Vec<usize>,
}

impl MerkleTree {
    /// Hash every leaf and layer up to the root
    pub fn new(leaves: Vec<Vec<u8>>, digest: Arc<HashDigestProvider>) -> Result<Self> {
        let depth = tree_depth(leaves.len());

        let hash_leaf = |(index, bytes): (usize, &Vec<u8>)| {
            let nonce = digest.leaf_nonce(index);
            digest.leaf_hash(index, nonce.as_deref(), bytes)
        };
        let mut nodes: Vec<HashValue> = if leaves.len() >= PARALLEL_HASH_THRESHOLD {
            leaves.par_iter().enumerate().map(hash_leaf).collect::<Result<_>>()?
        } else {
            leaves.iter().enumerate().map(hash_leaf).collect::<Result<_>>()?
        };

        let mut layer_offsets = vec![0];
        for level in 0..depth {
            let start = layer_offsets[level];
            let next = hash_layer(digest.as_ref(), &nodes[start..], node_height(level, leaves.len()));
            layer_offsets.push(nodes.len());
            nodes.extend(next);
        }
        layer_offsets.push(nodes.len());

        let tree = Self {
            leaves,
            digest,
            nodes,
            layer_offsets,
        };
        tracing::debug!(
            leaves = tree.leaf_count(),
            depth,
            variant = %tree.digest.variant(),
            root = %tree.root(),
            "built merkle tree"
        );
        Ok(tree)
    }

    /// Root hash of the tree
    pub fn root(&self) -> &HashValue {
        &self.nodes[self.nodes.len() - 1]
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves.len()
    }

    pub fn depth(&self) -> usize {
        self.layer_offsets.len() - 2
    }

    pub fn leaves(&self) -> &[Vec<u8>] {
        &self.leaves
    }

    pub fn digest(&self) -> &Arc<HashDigestProvider> {
        &self.digest
    }

    /// All hashes of one layer, leaves at level 0
    pub fn layer(&self, level: usize) -> &[HashValue] {
        &self.nodes[self.layer_offsets[level]..self.layer_offsets[level + 1]]
    }

    fn node(&self, level: usize, position: usize) -> &HashValue {
        &self.nodes[self.layer_offsets[level] + position]
    }

    /// Proof revealing the leaves at `indices` plus the siblings needed to reach the root
    pub fn create_audit_proof(&self, indices: &[usize]) -> Result<MerkleProof> {
        let requested = checked_indices(indices, self.leaf_count())?;
        let hashes = audit_path(self.leaf_count(), &requested, |level, position| {
            Ok(self.node(level, position).clone())
        })?;

        let leaves = requested
            .iter()
            .map(|&index| {
                IndexedMerkleLeaf::new(
                    index,
                    self.digest.leaf_nonce(index),
                    self.leaves[index].clone(),
                )
            })
            .collect();

        tracing::debug!(
            revealed = requested.len(),
            siblings = hashes.len(),
            "created audit proof"
        );
        Ok(MerkleProof::new(
            ProofType::Audit,
            self.leaf_count(),
            leaves,
            hashes,
        ))
    }

    /// Proof of the leaf count carrying blinded leaf hashes and no leaf content.
    ///
    /// Only nonce-based providers can emit one; verify it with
    /// [`HashDigestProvider::size_proof_verifier`].
    pub fn size_proof(&self) -> Result<MerkleProof> {
        if !self.digest.supports_size_proof() {
            return Err(MerkleError::SizeProofUnsupported {
                variant: self.digest.variant().to_string(),
            });
        }

        let leaves = self
            .layer(0)
            .iter()
            .enumerate()
            .map(|(index, hash)| IndexedMerkleLeaf::new(index, None, hash.as_bytes().to_vec()))
            .collect();

        tracing::debug!(leaves = self.leaf_count(), "created size proof");
        Ok(MerkleProof::new(
            ProofType::Size,
            self.leaf_count(),
            leaves,
            Vec::new(),
        ))
    }
}

fn hash_layer(digest: &HashDigestProvider, previous: &[HashValue], depth: usize) -> Vec<HashValue> {
    let zero = digest.zero_hash();
    if previous.is_empty() {
        return vec![digest.node_hash(depth, &zero, &zero)];
    }

    let pair = |chunk: &[HashValue]| digest.node_hash(depth, &chunk[0], chunk.get(1).unwrap_or(&zero));
    if previous.len() >= PARALLEL_HASH_THRESHOLD {
        previous.par_chunks(2).map(pair).collect()
    } else {
        previous.chunks(2).map(pair).collect()
    }
}

/// Deduplicate and range-check requested leaf indices
pub(crate) fn checked_indices(indices: &[usize], leaf_count: usize) -> Result<BTreeSet<usize>> {
    if indices.is_empty() {
        return Err(MerkleError::EmptyLeafIndices);
    }
    let requested: BTreeSet<usize> = indices.iter().copied().collect();
    if let Some(&index) = requested.iter().find(|&&index| index >= leaf_count) {
        return Err(MerkleError::LeafIndexOutOfRange { index, leaf_count });
    }
    Ok(requested)
}

/// Walk the tree shape bottom-up and collect, in proof order, the sibling of every
/// on-path node whose sibling is off the path. Zero-hash padding is never collected.
pub(crate) fn audit_path<F>(
    leaf_count: usize,
    requested: &BTreeSet<usize>,
    mut fetch: F,
) -> Result<Vec<HashValue>>
where
    F: FnMut(usize, usize) -> Result<HashValue>,
{
    let mut in_path = vec![false; leaf_count];
    for &index in requested {
        in_path[index] = true;
    }

    let mut hashes = Vec::new();
    for level in 0..tree_depth(leaf_count) {
        let width = in_path.len();
        let mut next = vec![false; width.div_ceil(2)];
        for position in (0..width).step_by(2) {
            let left = in_path[position];
            let right = position + 1 < width && in_path[position + 1];
            if position + 1 < width {
                if left && !right {
                    hashes.push(fetch(level, position + 1)?);
                } else if !left && right {
                    hashes.push(fetch(level, position)?);
                }
            }
            next[position / 2] = left || right;
        }
        in_path = next;
    }
    Ok(hashes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hash::DigestAlgorithm;

    fn default_tree(count: usize) -> MerkleTree {
        let leaves = (0..count).map(|i| format!("leaf{}", i).into_bytes()).collect();
        let digest = Arc::new(HashDigestProvider::default_provider(DigestAlgorithm::Sha256));
        MerkleTree::new(leaves, digest).unwrap()
    }

    #[test]
    fn test_tree_depth() {
        assert_eq!(tree_depth(0), 1);
        assert_eq!(tree_depth(1), 1);
        assert_eq!(tree_depth(2), 1);
        assert_eq!(tree_depth(3), 2);
        assert_eq!(tree_depth(4), 2);
        assert_eq!(tree_depth(5), 3);
        assert_eq!(tree_depth(8), 3);
        assert_eq!(tree_depth(9), 4);
    }

    #[test]
    fn test_node_height() {
        // inner pairs count up from the leaves
        assert_eq!(node_height(0, 8), 0);
        assert_eq!(node_height(1, 8), 1);
        // the root pair carries the leaf count
        assert_eq!(node_height(2, 8), 7);
        assert_eq!(node_height(2, 7), 6);
        assert_eq!(node_height(0, 1), 0);
        assert_eq!(node_height(0, 0), 0);
    }

    #[test]
    fn test_root_pair_is_bound_to_leaf_count() {
        let tree = default_tree(4);
        let digest = tree.digest().clone();
        let top = tree.layer(1);
        assert_eq!(*tree.root(), digest.node_hash(3, &top[0], &top[1]));
        assert_ne!(*tree.root(), digest.node_hash(1, &top[0], &top[1]));
    }

    #[test]
    fn test_layer_widths() {
        let tree = default_tree(5);
        assert_eq!(tree.depth(), 3);
        let widths: Vec<usize> = (0..=tree.depth()).map(|l| tree.layer(l).len()).collect();
        assert_eq!(widths, vec![5, 3, 2, 1]);
        assert_eq!(tree.layer(3)[0], *tree.root());
    }

    #[test]
    fn test_odd_layer_is_padded_with_zero_hash() {
        let tree = default_tree(3);
        let digest = tree.digest().clone();
        let zero = digest.zero_hash();
        let expected_right = digest.node_hash(0, &tree.layer(0)[2], &zero);
        assert_eq!(tree.layer(1)[1], expected_right);
        // a duplicated last node would give a different hash
        let duplicated = digest.node_hash(0, &tree.layer(0)[2], &tree.layer(0)[2]);
        assert_ne!(tree.layer(1)[1], duplicated);
    }

    #[test]
    fn test_empty_tree_has_canonical_root() {
        let tree = default_tree(0);
        let digest = tree.digest().clone();
        let zero = digest.zero_hash();
        assert_eq!(*tree.root(), digest.node_hash(0, &zero, &zero));
        assert_eq!(tree.leaf_count(), 0);
    }

    #[test]
    fn test_parallel_and_sequential_layers_agree() {
        let digest = HashDigestProvider::default_provider(DigestAlgorithm::Sha256);
        let leaves: Vec<HashValue> = (0..PARALLEL_HASH_THRESHOLD + 3)
            .map(|i| DigestAlgorithm::Sha256.hash(&i.to_le_bytes()))
            .collect();
        let parallel = hash_layer(&digest, &leaves, 4);

        let zero = digest.zero_hash();
        let sequential: Vec<HashValue> = leaves
            .chunks(2)
            .map(|c| digest.node_hash(4, &c[0], c.get(1).unwrap_or(&zero)))
            .collect();
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_checked_indices() {
        assert!(matches!(
            checked_indices(&[], 4),
            Err(MerkleError::EmptyLeafIndices)
        ));
        assert!(matches!(
            checked_indices(&[1, 4], 4),
            Err(MerkleError::LeafIndexOutOfRange { index: 4, leaf_count: 4 })
        ));
        let set = checked_indices(&[3, 1, 3], 4).unwrap();
        assert_eq!(set.into_iter().collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn test_size_proof_needs_nonce_provider() {
        let tree = default_tree(4);
        assert!(matches!(
            tree.size_proof(),
            Err(MerkleError::SizeProofUnsupported { .. })
        ));
    }
}
