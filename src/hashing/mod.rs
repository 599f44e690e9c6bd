//! Hash digest descriptions and the providers built from them
//!
//! A [`HashDigest`] names a base algorithm, a provider variant and its options.
//! [`HashDigestProvider`] turns that description into leaf and node hashing.

pub mod constants;
pub mod options;
pub mod provider;

pub use constants::DigestVariant;
pub use options::{HashDigestOptions, OptionValue};
pub use provider::{HashDigestProvider, MerkleTreeHashDigest};

use crate::core::error::Result;
use crate::core::hash::DigestAlgorithm;

/// Validated description of a digest provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashDigest {
    algorithm: DigestAlgorithm,
    variant: DigestVariant,
    options: HashDigestOptions,
}

impl HashDigest {
    /// Resolve algorithm and variant names and check the option keys
    pub fn new(algorithm_name: &str, variant_name: &str, options: HashDigestOptions) -> Result<Self> {
        let algorithm = DigestAlgorithm::from_name(algorithm_name)?;
        let variant = DigestVariant::from_name(variant_name)?;
        options.ensure_recognized()?;
        Ok(Self {
            algorithm,
            variant,
            options,
        })
    }

    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    pub fn variant(&self) -> DigestVariant {
        self.variant
    }

    pub fn options(&self) -> &HashDigestOptions {
        &self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::MerkleError;

    #[test]
    fn test_hash_digest_resolves_names() {
        let digest = HashDigest::new(
            "SHA-256",
            constants::HASH_DIGEST_PROVIDER_DEFAULT_NAME,
            HashDigestOptions::new(),
        )
        .unwrap();
        assert_eq!(digest.algorithm(), DigestAlgorithm::Sha256);
        assert_eq!(digest.variant(), DigestVariant::Default);
    }

    #[test]
    fn test_hash_digest_rejects_bad_input() {
        let banned = HashDigest::new(
            "MD5",
            constants::HASH_DIGEST_PROVIDER_DEFAULT_NAME,
            HashDigestOptions::new(),
        );
        assert!(matches!(banned, Err(MerkleError::BannedAlgorithm { .. })));

        let unknown = HashDigest::new("SHA-256", "Nope", HashDigestOptions::new());
        assert!(matches!(unknown, Err(MerkleError::UnknownVariant { .. })));
    }
}
