//! Proof rebuilding and verification

use crate::core::{error::*, types::*};
use crate::hashing::MerkleTreeHashDigest;
use crate::proofs::merkle::{audit_path, node_height, tree_depth};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// What a proof authenticates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProofType {
    /// Selected leaves and the siblings that connect them to the root
    Audit,
    /// The leaf count, through blinded leaf hashes only
    Size,
}

/// Merkle proof over a tree of `tree_size` leaves
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleProof {
    proof_type: ProofType,
    tree_size: usize,
    leaves: Vec<IndexedMerkleLeaf>,
    hashes: Vec<HashValue>,
}

/// Everything learned while replaying a proof, keyed by (level, position)
struct Rebuilt {
    root: HashValue,
    known: BTreeMap<(usize, usize), HashValue>,
}

impl MerkleProof {
    pub fn new(
        proof_type: ProofType,
        tree_size: usize,
        leaves: Vec<IndexedMerkleLeaf>,
        hashes: Vec<HashValue>,
    ) -> Self {
        Self {
            proof_type,
            tree_size,
            leaves,
            hashes,
        }
    }

    pub fn proof_type(&self) -> ProofType {
        self.proof_type
    }

    /// Leaf count of the tree the proof was taken from
    pub fn tree_size(&self) -> usize {
        self.tree_size
    }

    pub fn leaves(&self) -> &[IndexedMerkleLeaf] {
        &self.leaves
    }

    /// Sibling hashes in the order they are consumed
    pub fn hashes(&self) -> &[HashValue] {
        &self.hashes
    }

    pub fn into_parts(self) -> (ProofType, usize, Vec<IndexedMerkleLeaf>, Vec<HashValue>) {
        (self.proof_type, self.tree_size, self.leaves, self.hashes)
    }

    /// Recompute the root the proof commits to
    pub fn calculate_root<D>(&self, digest: &D) -> Result<HashValue>
    where
        D: MerkleTreeHashDigest + ?Sized,
    {
        Ok(self.rebuild(digest)?.root)
    }

    /// `Ok(false)` when the proof rebuilds to another root, `Err` when it cannot be rebuilt
    pub fn verify<D>(&self, expected_root: &HashValue, digest: &D) -> Result<bool>
    where
        D: MerkleTreeHashDigest + ?Sized,
    {
        let root = self.calculate_root(digest)?;
        let matches = root == *expected_root;
        if !matches {
            tracing::debug!(%root, expected = %expected_root, "proof root mismatch");
        }
        Ok(matches)
    }

    /// Narrow an audit proof to some of the leaves it already reveals
    pub fn subset<D>(&self, indices: &[usize], digest: &D) -> Result<MerkleProof>
    where
        D: MerkleTreeHashDigest + ?Sized,
    {
        self.ensure_audit("subset")?;
        if indices.is_empty() {
            return Err(MerkleError::EmptyLeafIndices);
        }
        let requested: BTreeSet<usize> = indices.iter().copied().collect();
        let revealed: BTreeSet<usize> = self.leaves.iter().map(|leaf| leaf.index).collect();
        if let Some(index) = requested.difference(&revealed).next() {
            return Err(MerkleError::invalid_argument(format!(
                "leaf {} is not revealed by this proof",
                index
            )));
        }

        let rebuilt = self.rebuild(digest)?;
        let hashes = audit_path(self.tree_size, &requested, |level, position| {
            lookup(&rebuilt.known, level, position)
        })?;
        let leaves = self
            .leaves
            .iter()
            .filter(|leaf| requested.contains(&leaf.index))
            .cloned()
            .collect();

        Ok(MerkleProof::new(ProofType::Audit, self.tree_size, leaves, hashes))
    }

    /// Union of two audit proofs taken from the same tree
    pub fn merge<D>(&self, other: &MerkleProof, digest: &D) -> Result<MerkleProof>
    where
        D: MerkleTreeHashDigest + ?Sized,
    {
        self.ensure_audit("merge")?;
        other.ensure_audit("merge")?;
        if self.tree_size != other.tree_size {
            return Err(MerkleError::invalid_argument(format!(
                "cannot merge proofs over {} and {} leaves",
                self.tree_size, other.tree_size
            )));
        }

        let mut ours = self.rebuild(digest)?;
        let theirs = other.rebuild(digest)?;
        if ours.root != theirs.root {
            return Err(MerkleError::invalid_argument(
                "cannot merge proofs that rebuild to different roots",
            ));
        }

        let mut leaves: BTreeMap<usize, IndexedMerkleLeaf> = BTreeMap::new();
        for leaf in self.leaves.iter().chain(other.leaves.iter()) {
            match leaves.get(&leaf.index) {
                Some(existing) if existing != leaf => {
                    return Err(MerkleError::invalid_argument(format!(
                        "proofs disagree on the content of leaf {}",
                        leaf.index
                    )));
                }
                Some(_) => {}
                None => {
                    leaves.insert(leaf.index, leaf.clone());
                }
            }
        }

        ours.known.extend(theirs.known);
        let indices: BTreeSet<usize> = leaves.keys().copied().collect();
        let hashes = audit_path(self.tree_size, &indices, |level, position| {
            lookup(&ours.known, level, position)
        })?;

        Ok(MerkleProof::new(
            ProofType::Audit,
            self.tree_size,
            leaves.into_values().collect(),
            hashes,
        ))
    }

    /// Serialize proof to JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(MerkleError::JsonSerialization)
    }

    /// Deserialize proof from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(MerkleError::JsonSerialization)
    }

    fn ensure_audit(&self, operation: &str) -> Result<()> {
        if self.proof_type != ProofType::Audit {
            return Err(MerkleError::invalid_argument(format!(
                "{} is only defined for audit proofs",
                operation
            )));
        }
        Ok(())
    }

    fn check_structure(&self) -> Result<()> {
        if self
            .leaves
            .windows(2)
            .any(|pair| pair[0].index >= pair[1].index)
        {
            return Err(MerkleError::rebuild_failure(
                "leaves must be sorted by index without duplicates",
            ));
        }
        if let Some(leaf) = self.leaves.last() {
            if leaf.index >= self.tree_size {
                return Err(MerkleError::rebuild_failure(format!(
                    "leaf index {} is outside a tree of {} leaves",
                    leaf.index, self.tree_size
                )));
            }
        }

        match self.proof_type {
            ProofType::Audit if self.leaves.is_empty() => Err(MerkleError::rebuild_failure(
                "audit proof reveals no leaves",
            )),
            ProofType::Audit => Ok(()),
            ProofType::Size if self.leaves.len() != self.tree_size => {
                Err(MerkleError::rebuild_failure(format!(
                    "size proof declares {} leaves but carries {}",
                    self.tree_size,
                    self.leaves.len()
                )))
            }
            ProofType::Size if !self.hashes.is_empty() => Err(MerkleError::rebuild_failure(
                "size proof must not carry sibling hashes",
            )),
            ProofType::Size => Ok(()),
        }
    }

    fn rebuild<D>(&self, digest: &D) -> Result<Rebuilt>
    where
        D: MerkleTreeHashDigest + ?Sized,
    {
        self.check_structure()?;

        let algorithm = digest.algorithm();
        if let Some(hash) = self.hashes.iter().find(|hash| hash.algorithm() != algorithm) {
            return Err(MerkleError::rebuild_failure(format!(
                "sibling {} does not match digest algorithm {}",
                hash, algorithm
            )));
        }

        let zero = digest.zero_hash();
        let mut known = BTreeMap::new();

        // only a size proof can get here with no leaves
        if self.tree_size == 0 {
            let root = digest.node_hash(0, &zero, &zero);
            known.insert((1, 0), root.clone());
            return Ok(Rebuilt { root, known });
        }

        let mut current: Vec<(usize, HashValue)> = self
            .leaves
            .iter()
            .map(|leaf| {
                digest
                    .leaf_hash(leaf.index, leaf.nonce.as_deref(), &leaf.leaf_data)
                    .map(|hash| (leaf.index, hash))
                    .map_err(|e| MerkleError::rebuild_failure(e.to_string()))
            })
            .collect::<Result<_>>()?;
        for (position, hash) in &current {
            known.insert((0, *position), hash.clone());
        }

        let mut siblings = self.hashes.iter();
        let mut take_sibling = |level: usize, position: usize| {
            siblings.next().cloned().ok_or_else(|| {
                MerkleError::rebuild_failure(format!(
                    "ran out of sibling hashes at level {} position {}",
                    level, position
                ))
            })
        };

        let depth = tree_depth(self.tree_size);
        let mut width = self.tree_size;
        for level in 0..depth {
            let node_depth = node_height(level, self.tree_size);
            let mut next = Vec::with_capacity(current.len());
            let mut i = 0;
            while i < current.len() {
                let (position, hash) = &current[i];
                let position = *position;
                let combined = if position % 2 == 1 {
                    let sibling = take_sibling(level, position - 1)?;
                    let combined = digest.node_hash(node_depth, &sibling, hash);
                    known.insert((level, position - 1), sibling);
                    i += 1;
                    combined
                } else if position + 1 == width {
                    i += 1;
                    digest.node_hash(node_depth, hash, &zero)
                } else if let Some((_, right)) = current.get(i + 1).filter(|(p, _)| *p == position + 1) {
                    i += 2;
                    digest.node_hash(node_depth, hash, right)
                } else {
                    let sibling = take_sibling(level, position + 1)?;
                    let combined = digest.node_hash(node_depth, hash, &sibling);
                    known.insert((level, position + 1), sibling);
                    i += 1;
                    combined
                };
                known.insert((level + 1, position / 2), combined.clone());
                next.push((position / 2, combined));
            }
            current = next;
            width = width.div_ceil(2);
        }

        let unused = siblings.count();
        if unused > 0 {
            return Err(MerkleError::rebuild_failure(format!(
                "{} sibling hashes left unused",
                unused
            )));
        }

        match current.pop() {
            Some((0, root)) if current.is_empty() => Ok(Rebuilt { root, known }),
            _ => Err(MerkleError::rebuild_failure(
                "proof does not resolve to a single root",
            )),
        }
    }
}

fn lookup(known: &BTreeMap<(usize, usize), HashValue>, level: usize, position: usize) -> Result<HashValue> {
    known.get(&(level, position)).cloned().ok_or_else(|| {
        MerkleError::invalid_argument(format!(
            "node at level {} position {} is not covered by the proof",
            level, position
        ))
    })
}
