//! Audit proof generation and verification tests

use anyhow::Result;
use merkle_digest::{
    build_tree, DigestAlgorithm, HashDigestProvider, MerkleError, MerkleProof, MerkleTree,
    ProofType,
};
use proptest::prelude::*;
use rstest::rstest;
use std::sync::Arc;

fn tree_with(count: usize, digest: HashDigestProvider) -> MerkleTree {
    let leaves = (0..count).map(|i| format!("leaf{}", i).into_bytes()).collect();
    build_tree(leaves, Arc::new(digest)).unwrap()
}

fn default_tree(count: usize) -> MerkleTree {
    tree_with(count, HashDigestProvider::default_provider(DigestAlgorithm::Sha256))
}

#[test]
fn test_reveal_two_of_five() -> Result<()> {
    let tree = default_tree(5);
    let proof = tree.create_audit_proof(&[3, 0])?;

    assert_eq!(proof.proof_type(), ProofType::Audit);
    assert_eq!(proof.tree_size(), 5);
    let indices: Vec<usize> = proof.leaves().iter().map(|leaf| leaf.index).collect();
    assert_eq!(indices, vec![0, 3]);
    assert_eq!(proof.leaves()[1].leaf_data, b"leaf3".to_vec());
    assert_eq!(proof.hashes().len(), 3);
    assert!(proof.verify(tree.root(), tree.digest().as_ref())?);
    Ok(())
}

#[test]
fn test_rejects_bad_index_sets() {
    let tree = default_tree(4);
    assert!(matches!(
        tree.create_audit_proof(&[]),
        Err(MerkleError::EmptyLeafIndices)
    ));
    assert!(matches!(
        tree.create_audit_proof(&[0, 9]),
        Err(MerkleError::LeafIndexOutOfRange { index: 9, leaf_count: 4 })
    ));

    let empty = default_tree(0);
    let err = empty.create_audit_proof(&[0]).unwrap_err();
    assert!(err.is_invalid_argument());
}

#[test]
fn test_duplicate_indices_are_collapsed() -> Result<()> {
    let tree = default_tree(6);
    let once = tree.create_audit_proof(&[2])?;
    let twice = tree.create_audit_proof(&[2, 2])?;
    assert_eq!(once, twice);
    Ok(())
}

#[rstest]
#[case(1, vec![0], 0)]
#[case(2, vec![0], 1)]
#[case(2, vec![0, 1], 0)]
#[case(3, vec![2], 1)]
#[case(4, vec![1], 2)]
#[case(8, vec![0, 7], 4)]
#[case(8, vec![0, 1, 2, 3, 4, 5, 6, 7], 0)]
fn test_sibling_counts(#[case] count: usize, #[case] indices: Vec<usize>, #[case] siblings: usize) -> Result<()> {
    let tree = default_tree(count);
    let proof = tree.create_audit_proof(&indices)?;
    assert_eq!(proof.hashes().len(), siblings);
    assert!(proof.verify(tree.root(), tree.digest().as_ref())?);
    Ok(())
}

#[test]
fn test_mutated_leaf_fails_verification() -> Result<()> {
    let tree = default_tree(9);
    let (proof_type, size, mut leaves, hashes) = tree.create_audit_proof(&[4])?.into_parts();
    leaves[0].leaf_data[0] ^= 0x01;
    let forged = MerkleProof::new(proof_type, size, leaves, hashes);
    assert!(!forged.verify(tree.root(), tree.digest().as_ref())?);
    Ok(())
}

#[test]
fn test_mutated_sibling_fails_verification() -> Result<()> {
    let tree = default_tree(9);
    let (proof_type, size, leaves, mut hashes) = tree.create_audit_proof(&[4])?.into_parts();
    let mut bytes = hashes[1].as_bytes().to_vec();
    bytes[31] ^= 0x80;
    hashes[1] = merkle_digest::HashValue::new(DigestAlgorithm::Sha256, bytes)?;
    let forged = MerkleProof::new(proof_type, size, leaves, hashes);
    assert!(!forged.verify(tree.root(), tree.digest().as_ref())?);
    Ok(())
}

#[rstest]
#[case(4, 0, 3)]
#[case(4, 1, 3)]
#[case(8, 0, 7)]
#[case(8, 2, 5)]
#[case(3, 0, 4)]
#[case(6, 0, 5)]
fn test_redeclared_size_with_same_shape_fails(
    #[case] count: usize,
    #[case] index: usize,
    #[case] declared: usize,
) -> Result<()> {
    let tree = default_tree(count);
    let (proof_type, _, leaves, hashes) = tree.create_audit_proof(&[index])?.into_parts();
    let resized = MerkleProof::new(proof_type, declared, leaves, hashes);
    assert!(!resized.verify(tree.root(), tree.digest().as_ref())?);
    Ok(())
}

#[test]
fn test_redeclared_size_with_other_shape_fails() -> Result<()> {
    let tree = default_tree(8);
    let (proof_type, _, leaves, hashes) = tree.create_audit_proof(&[3])?.into_parts();
    let resized = MerkleProof::new(proof_type, 5, leaves, hashes);
    match resized.verify(tree.root(), tree.digest().as_ref()) {
        Ok(verified) => assert!(!verified),
        Err(err) => assert!(err.is_rebuild_failure()),
    }
    Ok(())
}

#[test]
fn test_truncated_or_padded_siblings_fail_rebuild() -> Result<()> {
    let tree = default_tree(9);
    let proof = tree.create_audit_proof(&[4])?;

    let (proof_type, size, leaves, mut hashes) = proof.clone().into_parts();
    hashes.pop();
    let truncated = MerkleProof::new(proof_type, size, leaves, hashes);
    let err = truncated.verify(tree.root(), tree.digest().as_ref()).unwrap_err();
    assert!(err.is_rebuild_failure());

    let (proof_type, size, leaves, mut hashes) = proof.into_parts();
    hashes.push(tree.root().clone());
    let padded = MerkleProof::new(proof_type, size, leaves, hashes);
    let err = padded.verify(tree.root(), tree.digest().as_ref()).unwrap_err();
    assert!(err.is_rebuild_failure());
    Ok(())
}

#[test]
fn test_nonce_tree_proofs_carry_nonces() -> Result<()> {
    let digest = HashDigestProvider::nonce_verify(DigestAlgorithm::Sha384, vec![3u8; 48])?;
    let tree = tree_with(6, digest.clone());
    let proof = tree.create_audit_proof(&[1, 5])?;

    for leaf in proof.leaves() {
        assert_eq!(leaf.nonce.as_ref().map(Vec::len), Some(48));
    }
    assert!(proof.verify(tree.root(), &digest)?);

    // nonces travel in the proof, so any nonce provider can replay it
    let other = HashDigestProvider::nonce(DigestAlgorithm::Sha384)?;
    assert!(proof.verify(tree.root(), &other)?);

    // a provider without nonces cannot
    let plain = HashDigestProvider::default_provider(DigestAlgorithm::Sha384);
    assert!(proof.verify(tree.root(), &plain).unwrap_err().is_rebuild_failure());
    Ok(())
}

#[test]
fn test_subset_and_merge_round_trip() -> Result<()> {
    let tree = default_tree(11);
    let digest = tree.digest().clone();

    let left = tree.create_audit_proof(&[1, 2])?;
    let right = tree.create_audit_proof(&[9])?;
    let merged = left.merge(&right, digest.as_ref())?;
    assert_eq!(merged, tree.create_audit_proof(&[1, 2, 9])?);

    let narrowed = merged.subset(&[9], digest.as_ref())?;
    assert_eq!(narrowed, right);
    assert!(narrowed.verify(tree.root(), digest.as_ref())?);

    let err = right.subset(&[1], digest.as_ref()).unwrap_err();
    assert!(err.is_invalid_argument());
    Ok(())
}

#[test]
fn test_proof_json_round_trip() -> Result<()> {
    let tree = default_tree(5);
    let proof = tree.create_audit_proof(&[0, 4])?;
    let json = proof.to_json()?;
    assert!(json.contains("\"proof_type\": \"AUDIT\""));
    assert!(json.contains("SHA-256:"));

    let restored = MerkleProof::from_json(&json)?;
    assert_eq!(restored, proof);
    assert!(restored.verify(tree.root(), tree.digest().as_ref())?);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_every_subset_verifies(
        count in 1usize..70,
        picks in prop::collection::vec(any::<prop::sample::Index>(), 1..8),
    ) {
        let tree = default_tree(count);
        let indices: Vec<usize> = picks.iter().map(|pick| pick.index(count)).collect();
        let proof = tree.create_audit_proof(&indices).unwrap();
        prop_assert!(proof.verify(tree.root(), tree.digest().as_ref()).unwrap());
        prop_assert_eq!(proof.calculate_root(tree.digest().as_ref()).unwrap(), tree.root().clone());
    }

    #[test]
    fn prop_flipped_leaf_byte_is_detected(
        count in 1usize..40,
        pick in any::<prop::sample::Index>(),
    ) {
        let tree = default_tree(count);
        let index = pick.index(count);
        let (proof_type, size, mut leaves, hashes) =
            tree.create_audit_proof(&[index]).unwrap().into_parts();
        leaves[0].leaf_data.push(0xff);
        let forged = MerkleProof::new(proof_type, size, leaves, hashes);
        prop_assert!(!forged.verify(tree.root(), tree.digest().as_ref()).unwrap());
    }
}
