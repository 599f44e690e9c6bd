//! TOML-backed digest provider configuration

use crate::core::error::{MerkleError, Result};
use crate::core::hash::DigestAlgorithm;
use crate::hashing::constants::*;
use crate::hashing::{HashDigestOptions, HashDigestProvider};
use crate::proofs::factory::build_digest_provider;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Which digest provider to build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigestConfig {
    /// Base hash algorithm name
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
    /// Digest provider variant name
    #[serde(default = "default_variant")]
    pub variant: String,
    /// Provider options
    #[serde(default)]
    pub options: DigestOptionsConfig,
}

/// Provider options, byte values hex encoded
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DigestOptionsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leaf_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entropy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entropy_length: Option<u64>,
}

fn default_algorithm() -> String {
    DigestAlgorithm::Sha256.name().to_string()
}

fn default_variant() -> String {
    HASH_DIGEST_PROVIDER_DEFAULT_NAME.to_string()
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            algorithm: default_algorithm(),
            variant: default_variant(),
            options: DigestOptionsConfig::default(),
        }
    }
}

impl DigestConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| MerkleError::configuration(format!("Failed to parse digest config: {}", e)))
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| MerkleError::configuration(format!("Failed to serialize config: {}", e)))
    }

    /// Convert to the option mapping understood by the provider factory
    pub fn to_options(&self) -> Result<HashDigestOptions> {
        let mut options = HashDigestOptions::new();
        let byte_options = [
            (HASH_DIGEST_PROVIDER_LEAF_PREFIX_OPTION, &self.options.leaf_prefix),
            (HASH_DIGEST_PROVIDER_NODE_PREFIX_OPTION, &self.options.node_prefix),
            (HASH_DIGEST_PROVIDER_ENTROPY_OPTION, &self.options.entropy),
        ];
        for (key, value) in byte_options {
            if let Some(text) = value {
                let bytes = hex::decode(text)
                    .map_err(|e| MerkleError::invalid_option(key, format!("not valid hex: {}", e)))?;
                options = options.with_bytes(key, bytes);
            }
        }
        if let Some(length) = self.options.entropy_length {
            options = options.with_number(HASH_DIGEST_PROVIDER_ENTROPY_LENGTH_OPTION, length);
        }
        Ok(options)
    }

    /// Build the configured provider
    pub fn build_provider(&self) -> Result<Arc<HashDigestProvider>> {
        build_digest_provider(&self.algorithm, &self.variant, self.to_options()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashing::DigestVariant;
    use tempfile::NamedTempFile;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = DigestConfig::from_toml_str("").unwrap();
        assert_eq!(config, DigestConfig::default());
        let provider = config.build_provider().unwrap();
        assert_eq!(provider.variant(), DigestVariant::Default);
    }

    #[test]
    fn test_tweakable_from_toml() {
        let config = DigestConfig::from_toml_str(
            r#"
            algorithm = "SHA-512"
            variant = "TweakableHashDigestProvider"

            [options]
            leaf_prefix = "aa"
            node_prefix = "bb"
            "#,
        )
        .unwrap();

        let provider = config.build_provider().unwrap();
        assert_eq!(provider.variant(), DigestVariant::Tweakable);
        assert_eq!(provider.leaf_prefix(), &[0xaa_u8][..]);
        assert_eq!(provider.node_prefix(), &[0xbb_u8][..]);
    }

    #[test]
    fn test_bad_hex_names_option() {
        let config = DigestConfig {
            variant: HASH_DIGEST_PROVIDER_TWEAKABLE_NAME.to_string(),
            options: DigestOptionsConfig {
                leaf_prefix: Some("zz".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let err = config.to_options().unwrap_err();
        assert!(err.to_string().contains("leafPrefix"));
    }

    #[test]
    fn test_unknown_option_field_rejected() {
        let err = DigestConfig::from_toml_str("[options]\nleaf_prefx = \"00\"\n").unwrap_err();
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_load_roundtrip() -> anyhow::Result<()> {
        let config = DigestConfig {
            variant: HASH_DIGEST_PROVIDER_NONCE_VERIFY_NAME.to_string(),
            options: DigestOptionsConfig {
                entropy: Some(hex::encode([5u8; 32])),
                ..Default::default()
            },
            ..Default::default()
        };

        let mut file = NamedTempFile::new()?;
        file.write_all(config.to_toml_string()?.as_bytes())?;
        file.flush()?;

        let loaded = DigestConfig::load(file.path())?;
        assert_eq!(loaded, config);
        assert_eq!(loaded.build_provider()?.variant(), DigestVariant::NonceVerify);
        Ok(())
    }
}
