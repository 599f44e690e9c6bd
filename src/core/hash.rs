//! Base hash algorithms for merkle_digest

use crate::core::error::{MerkleError, Result};
use crate::core::types::HashValue;
use digest::DynDigest;
use serde::{Deserialize, Serialize};
use sha2::{Sha224, Sha256, Sha384, Sha512};
use std::fmt;
use std::str::FromStr;

/// Algorithms that must never back a merkle tree
pub const BANNED_ALGORITHMS: &[&str] = &["MD2", "MD4", "MD5", "SHA-1", "SHA1", "SHA", "NONE"];

/// Supported one-way hash functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DigestAlgorithm {
    #[serde(rename = "SHA-224")]
    Sha224,
    #[serde(rename = "SHA-256")]
    Sha256,
    #[serde(rename = "SHA-384")]
    Sha384,
    #[serde(rename = "SHA-512")]
    Sha512,
}

impl DigestAlgorithm {
    pub const ALL: [DigestAlgorithm; 4] = [Self::Sha224, Self::Sha256, Self::Sha384, Self::Sha512];

    /// Canonical name, as used in `HashValue` tags
    pub fn name(self) -> &'static str {
        match self {
            Self::Sha224 => "SHA-224",
            Self::Sha256 => "SHA-256",
            Self::Sha384 => "SHA-384",
            Self::Sha512 => "SHA-512",
        }
    }

    /// Output length in bytes
    pub fn digest_length(self) -> usize {
        match self {
            Self::Sha224 => 28,
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }

    /// Look up an algorithm by name, rejecting banned and unknown names.
    ///
    /// Matching ignores case and dashes, so `sha256` and `SHA-256` are the same.
    pub fn from_name(name: &str) -> Result<Self> {
        let normalized = normalize(name);
        if BANNED_ALGORITHMS
            .iter()
            .any(|banned| normalize(banned) == normalized)
        {
            tracing::warn!(algorithm = name, "rejected banned digest algorithm");
            return Err(MerkleError::BannedAlgorithm {
                name: name.to_string(),
            });
        }

        Self::ALL
            .into_iter()
            .find(|algorithm| normalize(algorithm.name()) == normalized)
            .ok_or_else(|| MerkleError::UnsupportedAlgorithm {
                name: name.to_string(),
            })
    }

    fn hasher(self) -> Box<dyn DynDigest> {
        match self {
            Self::Sha224 => Box::new(Sha224::default()),
            Self::Sha256 => Box::new(Sha256::default()),
            Self::Sha384 => Box::new(Sha384::default()),
            Self::Sha512 => Box::new(Sha512::default()),
        }
    }

    /// Hash the concatenation of several byte slices
    pub fn hash_chunks(self, chunks: &[&[u8]]) -> HashValue {
        let mut hasher = self.hasher();
        for chunk in chunks {
            hasher.update(chunk);
        }
        HashValue::from_digest_output(self, hasher.finalize().into_vec())
    }

    /// Hash a single byte slice
    pub fn hash(self, data: &[u8]) -> HashValue {
        self.hash_chunks(&[data])
    }

    /// The zero-hash sentinel used to pad odd layers
    pub fn zero_hash(self) -> HashValue {
        HashValue::zero(self)
    }
}

fn normalize(name: &str) -> String {
    name.trim()
        .chars()
        .filter(|c| *c != '-' && *c != '_')
        .collect::<String>()
        .to_ascii_uppercase()
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DigestAlgorithm {
    type Err = MerkleError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_answer() {
        let hash = DigestAlgorithm::Sha256.hash(b"");
        assert_eq!(
            hash.to_hex(),
            "E3B0C44298FC1C149AFBF4C8996FB92427AE41E4649B934CA495991B7852B855"
        );
    }

    #[test]
    fn test_hash_chunks_matches_concatenation() {
        let chunked = DigestAlgorithm::Sha512.hash_chunks(&[b"Hello, ", b"World!"]);
        let direct = DigestAlgorithm::Sha512.hash(b"Hello, World!");
        assert_eq!(chunked, direct);
        assert_eq!(chunked.as_bytes().len(), 64);
    }

    #[test]
    fn test_name_lookup() {
        assert_eq!(
            DigestAlgorithm::from_name("sha256").unwrap(),
            DigestAlgorithm::Sha256
        );
        assert_eq!(
            DigestAlgorithm::from_name("SHA-384").unwrap(),
            DigestAlgorithm::Sha384
        );
        for algorithm in DigestAlgorithm::ALL {
            assert_eq!(DigestAlgorithm::from_name(algorithm.name()).unwrap(), algorithm);
        }
    }

    #[test]
    fn test_banned_algorithms_rejected() {
        for name in ["MD5", "md5", "SHA-1", "sha1"] {
            let err = DigestAlgorithm::from_name(name).unwrap_err();
            assert!(matches!(err, MerkleError::BannedAlgorithm { .. }), "{name}");
        }
        assert!(matches!(
            DigestAlgorithm::from_name("WHIRLPOOL").unwrap_err(),
            MerkleError::UnsupportedAlgorithm { .. }
        ));
    }

    #[test]
    fn test_zero_hash_sizes() {
        for algorithm in DigestAlgorithm::ALL {
            let zero = algorithm.zero_hash();
            assert!(zero.is_zero());
            assert_eq!(zero.as_bytes().len(), algorithm.digest_length());
        }
    }
}
