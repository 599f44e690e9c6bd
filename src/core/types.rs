//! Core data types for merkle_digest

use crate::core::error::{MerkleError, Result};
use crate::core::hash::DigestAlgorithm;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Digest bytes tagged with the algorithm that produced them
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct HashValue {
    algorithm: DigestAlgorithm,
    bytes: Vec<u8>,
}

impl HashValue {
    /// Create a hash value, checking the byte length against the algorithm
    pub fn new(algorithm: DigestAlgorithm, bytes: Vec<u8>) -> Result<Self> {
        if bytes.len() != algorithm.digest_length() {
            return Err(MerkleError::invalid_argument(format!(
                "{} digest must be {} bytes, got {}",
                algorithm,
                algorithm.digest_length(),
                bytes.len()
            )));
        }
        Ok(Self { algorithm, bytes })
    }

    /// Wrap digest output whose length is already known to be correct
    pub(crate) fn from_digest_output(algorithm: DigestAlgorithm, bytes: Vec<u8>) -> Self {
        debug_assert_eq!(bytes.len(), algorithm.digest_length());
        Self { algorithm, bytes }
    }

    /// The zero-hash sentinel for an algorithm: `digest_length` zero bytes
    pub fn zero(algorithm: DigestAlgorithm) -> Self {
        Self {
            algorithm,
            bytes: vec![0u8; algorithm.digest_length()],
        }
    }

    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume the value and return the digest bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Upper-case hex of the digest bytes, without the algorithm tag
    pub fn to_hex(&self) -> String {
        hex::encode_upper(&self.bytes)
    }

    pub fn is_zero(&self) -> bool {
        self.bytes.iter().all(|b| *b == 0)
    }
}

impl fmt::Display for HashValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.to_hex())
    }
}

impl fmt::Debug for HashValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = self.to_hex();
        write!(f, "HashValue({}:{})", self.algorithm, &hex[..hex.len().min(8)])
    }
}

impl FromStr for HashValue {
    type Err = MerkleError;

    /// Parse the `ALGORITHM:HEX` form produced by `Display`
    fn from_str(s: &str) -> Result<Self> {
        let (name, hex_part) = s.rsplit_once(':').ok_or_else(|| {
            MerkleError::invalid_argument(format!("'{}' is not of the form ALGORITHM:HEX", s))
        })?;
        let algorithm = DigestAlgorithm::from_name(name)?;
        let bytes = hex::decode(hex_part)?;
        Self::new(algorithm, bytes)
    }
}

// Serialized as the `ALGORITHM:HEX` string rather than a byte array
impl Serialize for HashValue {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for HashValue {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// A revealed leaf inside a proof
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedMerkleLeaf {
    /// Position of the leaf in the originating tree
    pub index: usize,
    /// Nonce mixed into the leaf hash, for nonce-based providers
    #[serde(default, with = "hex_option", skip_serializing_if = "Option::is_none")]
    pub nonce: Option<Vec<u8>>,
    /// Leaf bytes, or the blinded leaf hash inside a size proof
    #[serde(with = "hex::serde")]
    pub leaf_data: Vec<u8>,
}

impl IndexedMerkleLeaf {
    pub fn new(index: usize, nonce: Option<Vec<u8>>, leaf_data: Vec<u8>) -> Self {
        Self {
            index,
            nonce,
            leaf_data,
        }
    }
}

mod hex_option {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(bytes) => serializer.serialize_some(&hex::encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|text| hex::decode(text).map_err(serde::de::Error::custom))
            .transpose()
    }
}
