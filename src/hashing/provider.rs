//! Digest providers: how leaves and child pairs become the next hash up the tree
//!
//! Every variant hashes with the same layout:
//!
//! - leaf: `H(leaf_prefix || nonce? || leaf_bytes)`
//! - node: `H(node_prefix || depth_be_u64 || left || right)`
//!
//! and differs only in where the prefixes and nonces come from.

use crate::core::error::{MerkleError, Result};
use crate::core::hash::DigestAlgorithm;
use crate::core::types::HashValue;
use crate::hashing::constants::*;
use crate::hashing::HashDigest;
use rand::rngs::OsRng;
use rand::RngCore;
use std::fmt;

/// Capability shared by every digest provider
pub trait MerkleTreeHashDigest {
    /// Base algorithm every produced hash is tagged with
    fn algorithm(&self) -> DigestAlgorithm;

    /// Nonce for the leaf at `index`, or `None` when the provider does not blind leaves
    fn leaf_nonce(&self, index: usize) -> Option<Vec<u8>>;

    /// Hash a leaf, failing when the nonce does not fit the provider
    fn leaf_hash(&self, index: usize, nonce: Option<&[u8]>, bytes: &[u8]) -> Result<HashValue>;

    /// Hash two children; `depth` is the pair's height above the leaves, or
    /// `leaf_count - 1` for the root pair
    fn node_hash(&self, depth: usize, left: &HashValue, right: &HashValue) -> HashValue;

    /// Sentinel paired with the last node of an odd layer
    fn zero_hash(&self) -> HashValue {
        self.algorithm().zero_hash()
    }
}

/// The closed set of digest providers
#[derive(Clone, PartialEq, Eq)]
pub enum HashDigestProvider {
    /// No nonces, fixed prefixes
    Default { algorithm: DigestAlgorithm },
    /// Nonces derived from provider entropy, random unless supplied
    Nonce {
        algorithm: DigestAlgorithm,
        entropy: Vec<u8>,
    },
    /// Nonces derived from a shared secret, reproducible for selective disclosure
    NonceVerify {
        algorithm: DigestAlgorithm,
        entropy: Vec<u8>,
    },
    /// Verifies size proofs: leaf bytes are already-blinded leaf hashes
    NonceSizeOnlyVerify { algorithm: DigestAlgorithm },
    /// No nonces, caller-chosen prefixes
    Tweakable {
        algorithm: DigestAlgorithm,
        leaf_prefix: Vec<u8>,
        node_prefix: Vec<u8>,
    },
}

impl HashDigestProvider {
    /// Build the provider described by a validated `HashDigest`
    pub fn from_digest(digest: &HashDigest) -> Result<Self> {
        let algorithm = digest.algorithm();
        let options = digest.options();
        let variant = digest.variant();

        for key in options.keys() {
            if !applies_to(variant, key) {
                tracing::debug!(%variant, option = key, "ignoring option not used by provider");
            }
        }

        let provider = match variant {
            DigestVariant::Default => Self::Default { algorithm },
            DigestVariant::Nonce => {
                let entropy = match options.bytes(HASH_DIGEST_PROVIDER_ENTROPY_OPTION)? {
                    Some(entropy) => checked_entropy(entropy)?,
                    None => {
                        let length = options
                            .number(HASH_DIGEST_PROVIDER_ENTROPY_LENGTH_OPTION)?
                            .map(|n| {
                                usize::try_from(n).map_err(|_| {
                                    MerkleError::invalid_option(
                                        HASH_DIGEST_PROVIDER_ENTROPY_LENGTH_OPTION,
                                        format!("{} does not fit in memory on this target", n),
                                    )
                                })
                            })
                            .transpose()?
                            .unwrap_or(DEFAULT_ENTROPY_LENGTH);
                        random_entropy(length)?
                    }
                };
                Self::Nonce { algorithm, entropy }
            }
            DigestVariant::NonceVerify => {
                let entropy = options
                    .bytes(HASH_DIGEST_PROVIDER_ENTROPY_OPTION)?
                    .ok_or_else(|| {
                        MerkleError::missing_option(variant.name(), HASH_DIGEST_PROVIDER_ENTROPY_OPTION)
                    })?;
                Self::NonceVerify {
                    algorithm,
                    entropy: checked_entropy(entropy)?,
                }
            }
            DigestVariant::NonceSizeOnlyVerify => Self::NonceSizeOnlyVerify { algorithm },
            DigestVariant::Tweakable => {
                let leaf_prefix = options
                    .bytes(HASH_DIGEST_PROVIDER_LEAF_PREFIX_OPTION)?
                    .ok_or_else(|| {
                        MerkleError::missing_option(variant.name(), HASH_DIGEST_PROVIDER_LEAF_PREFIX_OPTION)
                    })?;
                let node_prefix = options
                    .bytes(HASH_DIGEST_PROVIDER_NODE_PREFIX_OPTION)?
                    .ok_or_else(|| {
                        MerkleError::missing_option(variant.name(), HASH_DIGEST_PROVIDER_NODE_PREFIX_OPTION)
                    })?;
                Self::tweakable(algorithm, leaf_prefix.to_vec(), node_prefix.to_vec())?
            }
        };

        tracing::debug!(%variant, %algorithm, "built hash digest provider");
        Ok(provider)
    }

    pub fn default_provider(algorithm: DigestAlgorithm) -> Self {
        Self::Default { algorithm }
    }

    /// Nonce provider with fresh entropy from the OS random source
    pub fn nonce(algorithm: DigestAlgorithm) -> Result<Self> {
        Ok(Self::Nonce {
            algorithm,
            entropy: random_entropy(DEFAULT_ENTROPY_LENGTH)?,
        })
    }

    pub fn nonce_verify(algorithm: DigestAlgorithm, entropy: impl Into<Vec<u8>>) -> Result<Self> {
        let entropy: Vec<u8> = entropy.into();
        check_entropy_length(entropy.len())?;
        Ok(Self::NonceVerify { algorithm, entropy })
    }

    pub fn size_only_verify(algorithm: DigestAlgorithm) -> Self {
        Self::NonceSizeOnlyVerify { algorithm }
    }

    /// Tweakable provider; prefixes must be non-empty and prefix-free with respect to each other
    pub fn tweakable(
        algorithm: DigestAlgorithm,
        leaf_prefix: Vec<u8>,
        node_prefix: Vec<u8>,
    ) -> Result<Self> {
        if leaf_prefix.is_empty() {
            return Err(MerkleError::invalid_option(
                HASH_DIGEST_PROVIDER_LEAF_PREFIX_OPTION,
                "prefix must not be empty",
            ));
        }
        if node_prefix.is_empty() {
            return Err(MerkleError::invalid_option(
                HASH_DIGEST_PROVIDER_NODE_PREFIX_OPTION,
                "prefix must not be empty",
            ));
        }
        if leaf_prefix.starts_with(&node_prefix) || node_prefix.starts_with(&leaf_prefix) {
            return Err(MerkleError::invalid_option(
                HASH_DIGEST_PROVIDER_NODE_PREFIX_OPTION,
                "leaf and node prefixes must differ and neither may start with the other",
            ));
        }
        Ok(Self::Tweakable {
            algorithm,
            leaf_prefix,
            node_prefix,
        })
    }

    pub fn variant(&self) -> DigestVariant {
        match self {
            Self::Default { .. } => DigestVariant::Default,
            Self::Nonce { .. } => DigestVariant::Nonce,
            Self::NonceVerify { .. } => DigestVariant::NonceVerify,
            Self::NonceSizeOnlyVerify { .. } => DigestVariant::NonceSizeOnlyVerify,
            Self::Tweakable { .. } => DigestVariant::Tweakable,
        }
    }

    pub fn leaf_prefix(&self) -> &[u8] {
        match self {
            Self::Tweakable { leaf_prefix, .. } => leaf_prefix,
            _ => DEFAULT_LEAF_PREFIX,
        }
    }

    pub fn node_prefix(&self) -> &[u8] {
        match self {
            Self::Tweakable { node_prefix, .. } => node_prefix,
            _ => DEFAULT_NODE_PREFIX,
        }
    }

    /// Whether trees built with this provider can emit size proofs
    pub fn supports_size_proof(&self) -> bool {
        self.variant().uses_nonces()
    }

    /// The provider that verifies size proofs emitted by this one
    pub fn size_proof_verifier(&self) -> Option<Self> {
        self.supports_size_proof()
            .then(|| Self::size_only_verify(self.algorithm()))
    }

    fn entropy(&self) -> Option<&[u8]> {
        match self {
            Self::Nonce { entropy, .. } | Self::NonceVerify { entropy, .. } => Some(entropy),
            _ => None,
        }
    }
}

impl MerkleTreeHashDigest for HashDigestProvider {
    fn algorithm(&self) -> DigestAlgorithm {
        match self {
            Self::Default { algorithm }
            | Self::Nonce { algorithm, .. }
            | Self::NonceVerify { algorithm, .. }
            | Self::NonceSizeOnlyVerify { algorithm }
            | Self::Tweakable { algorithm, .. } => *algorithm,
        }
    }

    fn leaf_nonce(&self, index: usize) -> Option<Vec<u8>> {
        self.entropy().map(|entropy| {
            self.algorithm()
                .hash_chunks(&[entropy, &(index as u64).to_be_bytes()])
                .into_bytes()
        })
    }

    fn leaf_hash(&self, index: usize, nonce: Option<&[u8]>, bytes: &[u8]) -> Result<HashValue> {
        let algorithm = self.algorithm();
        match (self, nonce) {
            (Self::NonceSizeOnlyVerify { .. }, None) => {
                HashValue::new(algorithm, bytes.to_vec()).map_err(|_| {
                    MerkleError::invalid_argument(format!(
                        "leaf {} must carry a {}-byte pre-computed leaf hash, got {} bytes",
                        index,
                        algorithm.digest_length(),
                        bytes.len()
                    ))
                })
            }
            (Self::Nonce { .. } | Self::NonceVerify { .. }, Some(nonce)) => {
                if nonce.len() != algorithm.digest_length() {
                    return Err(MerkleError::invalid_argument(format!(
                        "leaf {} nonce must be {} bytes, got {}",
                        index,
                        algorithm.digest_length(),
                        nonce.len()
                    )));
                }
                Ok(algorithm.hash_chunks(&[self.leaf_prefix(), nonce, bytes]))
            }
            (Self::Default { .. } | Self::Tweakable { .. }, None) => {
                Ok(algorithm.hash_chunks(&[self.leaf_prefix(), bytes]))
            }
            (_, Some(_)) => Err(MerkleError::invalid_argument(format!(
                "{} does not accept a nonce for leaf {}",
                self.variant(),
                index
            ))),
            (_, None) => Err(MerkleError::invalid_argument(format!(
                "{} requires a nonce for leaf {}",
                self.variant(),
                index
            ))),
        }
    }

    fn node_hash(&self, depth: usize, left: &HashValue, right: &HashValue) -> HashValue {
        debug_assert_eq!(left.algorithm(), self.algorithm());
        debug_assert_eq!(right.algorithm(), self.algorithm());
        self.algorithm().hash_chunks(&[
            self.node_prefix(),
            &(depth as u64).to_be_bytes(),
            left.as_bytes(),
            right.as_bytes(),
        ])
    }
}

// Entropy is never printed
impl fmt::Debug for HashDigestProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("HashDigestProvider");
        out.field("variant", &self.variant())
            .field("algorithm", &self.algorithm());
        if let Self::Tweakable {
            leaf_prefix,
            node_prefix,
            ..
        } = self
        {
            out.field("leaf_prefix", &hex::encode(leaf_prefix))
                .field("node_prefix", &hex::encode(node_prefix));
        }
        if let Some(entropy) = self.entropy() {
            out.field("entropy_len", &entropy.len());
        }
        out.finish()
    }
}

fn applies_to(variant: DigestVariant, key: &str) -> bool {
    match variant {
        DigestVariant::Default | DigestVariant::NonceSizeOnlyVerify => false,
        DigestVariant::Nonce => {
            key == HASH_DIGEST_PROVIDER_ENTROPY_OPTION
                || key == HASH_DIGEST_PROVIDER_ENTROPY_LENGTH_OPTION
        }
        DigestVariant::NonceVerify => key == HASH_DIGEST_PROVIDER_ENTROPY_OPTION,
        DigestVariant::Tweakable => {
            key == HASH_DIGEST_PROVIDER_LEAF_PREFIX_OPTION
                || key == HASH_DIGEST_PROVIDER_NODE_PREFIX_OPTION
        }
    }
}

fn check_entropy_length(length: usize) -> Result<()> {
    if !(MIN_ENTROPY_LENGTH..=MAX_ENTROPY_LENGTH).contains(&length) {
        return Err(MerkleError::invalid_option(
            HASH_DIGEST_PROVIDER_ENTROPY_OPTION,
            format!(
                "entropy must be between {} and {} bytes, got {}",
                MIN_ENTROPY_LENGTH, MAX_ENTROPY_LENGTH, length
            ),
        ));
    }
    Ok(())
}

fn checked_entropy(entropy: &[u8]) -> Result<Vec<u8>> {
    check_entropy_length(entropy.len())?;
    Ok(entropy.to_vec())
}

fn random_entropy(length: usize) -> Result<Vec<u8>> {
    check_entropy_length(length)?;
    let mut entropy = vec![0u8; length];
    OsRng.fill_bytes(&mut entropy);
    Ok(entropy)
}
