//! Size proof verification
//!
//! A size proof carries one blinded leaf hash per leaf and nothing else, so a
//! verifier learns how many leaves the tree has without seeing any leaf content.

use crate::core::{error::*, types::*};
use crate::hashing::HashDigestProvider;
use crate::proofs::proof::{MerkleProof, ProofType};

/// Verify a size proof against a known root and, optionally, an expected leaf count.
///
/// The digest algorithm is taken from `expected_root`. Malformed proofs are
/// reported as errors, a wrong root or leaf count as `Ok(false)`.
pub fn verify_size_proof(
    proof: &MerkleProof,
    expected_root: &HashValue,
    expected_leaf_count: Option<usize>,
) -> Result<bool> {
    if proof.proof_type() != ProofType::Size {
        return Err(MerkleError::invalid_argument(format!(
            "expected a size proof, got {:?}",
            proof.proof_type()
        )));
    }

    if let Some(expected) = expected_leaf_count {
        if expected != proof.tree_size() {
            tracing::debug!(
                expected,
                declared = proof.tree_size(),
                "size proof declares another leaf count"
            );
            return Ok(false);
        }
    }

    let verifier = HashDigestProvider::size_only_verify(expected_root.algorithm());
    proof.verify(expected_root, &verifier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hash::DigestAlgorithm;
    use crate::proofs::merkle::MerkleTree;
    use std::sync::Arc;

    #[test]
    fn test_size_proof_verification() {
        let digest = Arc::new(HashDigestProvider::nonce(DigestAlgorithm::Sha256).unwrap());
        let leaves = vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()];
        let tree = MerkleTree::new(leaves, digest).unwrap();
        let proof = tree.size_proof().unwrap();

        assert!(verify_size_proof(&proof, tree.root(), Some(3)).unwrap());
        assert!(verify_size_proof(&proof, tree.root(), None).unwrap());
        assert!(!verify_size_proof(&proof, tree.root(), Some(4)).unwrap());
    }

    #[test]
    fn test_audit_proof_is_not_a_size_proof() {
        let digest = Arc::new(HashDigestProvider::default_provider(DigestAlgorithm::Sha256));
        let tree = MerkleTree::new(vec![b"a".to_vec()], digest).unwrap();
        let proof = tree.create_audit_proof(&[0]).unwrap();
        assert!(verify_size_proof(&proof, tree.root(), None)
            .unwrap_err()
            .is_invalid_argument());
    }
}
