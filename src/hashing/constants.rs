//! Names and option keys recognised by the digest provider factory

use crate::core::error::{MerkleError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const HASH_DIGEST_PROVIDER_DEFAULT_NAME: &str = "DefaultHashDigestProvider";
pub const HASH_DIGEST_PROVIDER_NONCE_NAME: &str = "NonceHashDigestProvider";
pub const HASH_DIGEST_PROVIDER_NONCE_VERIFY_NAME: &str = "NonceHashDigestProviderVerify";
pub const HASH_DIGEST_PROVIDER_NONCE_SIZE_ONLY_VERIFY_NAME: &str =
    "NonceHashDigestProviderSizeOnlyVerify";
pub const HASH_DIGEST_PROVIDER_TWEAKABLE_NAME: &str = "TweakableHashDigestProvider";

/// Domain separator prepended to leaf input (bytes)
pub const HASH_DIGEST_PROVIDER_LEAF_PREFIX_OPTION: &str = "leafPrefix";
/// Domain separator prepended to node input (bytes)
pub const HASH_DIGEST_PROVIDER_NODE_PREFIX_OPTION: &str = "nodePrefix";
/// Secret the per-leaf nonces are derived from (bytes)
pub const HASH_DIGEST_PROVIDER_ENTROPY_OPTION: &str = "entropy";
/// Length of freshly generated entropy (number)
pub const HASH_DIGEST_PROVIDER_ENTROPY_LENGTH_OPTION: &str = "entropyLength";

pub const RECOGNIZED_OPTIONS: &[&str] = &[
    HASH_DIGEST_PROVIDER_LEAF_PREFIX_OPTION,
    HASH_DIGEST_PROVIDER_NODE_PREFIX_OPTION,
    HASH_DIGEST_PROVIDER_ENTROPY_OPTION,
    HASH_DIGEST_PROVIDER_ENTROPY_LENGTH_OPTION,
];

pub const DEFAULT_LEAF_PREFIX: &[u8] = &[0x00];
pub const DEFAULT_NODE_PREFIX: &[u8] = &[0x01];

pub const DEFAULT_ENTROPY_LENGTH: usize = 32;
pub const MIN_ENTROPY_LENGTH: usize = 16;
pub const MAX_ENTROPY_LENGTH: usize = 1024;

/// The closed set of digest provider variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DigestVariant {
    #[serde(rename = "DefaultHashDigestProvider")]
    Default,
    #[serde(rename = "NonceHashDigestProvider")]
    Nonce,
    #[serde(rename = "NonceHashDigestProviderVerify")]
    NonceVerify,
    #[serde(rename = "NonceHashDigestProviderSizeOnlyVerify")]
    NonceSizeOnlyVerify,
    #[serde(rename = "TweakableHashDigestProvider")]
    Tweakable,
}

impl DigestVariant {
    pub const ALL: [DigestVariant; 5] = [
        Self::Default,
        Self::Nonce,
        Self::NonceVerify,
        Self::NonceSizeOnlyVerify,
        Self::Tweakable,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Default => HASH_DIGEST_PROVIDER_DEFAULT_NAME,
            Self::Nonce => HASH_DIGEST_PROVIDER_NONCE_NAME,
            Self::NonceVerify => HASH_DIGEST_PROVIDER_NONCE_VERIFY_NAME,
            Self::NonceSizeOnlyVerify => HASH_DIGEST_PROVIDER_NONCE_SIZE_ONLY_VERIFY_NAME,
            Self::Tweakable => HASH_DIGEST_PROVIDER_TWEAKABLE_NAME,
        }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|variant| variant.name() == name.trim())
            .ok_or_else(|| MerkleError::UnknownVariant {
                name: name.to_string(),
            })
    }

    /// Whether leaves of this variant are blinded with nonces
    pub fn uses_nonces(self) -> bool {
        matches!(self, Self::Nonce | Self::NonceVerify)
    }
}

impl fmt::Display for DigestVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DigestVariant {
    type Err = MerkleError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}
