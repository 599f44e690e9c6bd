//! String-keyed options for digest providers

use crate::core::error::{MerkleError, Result};
use crate::hashing::constants::{HASH_DIGEST_PROVIDER_ENTROPY_OPTION, RECOGNIZED_OPTIONS};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Option value types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Number(u64),
    Bytes(Vec<u8>),
}

impl OptionValue {
    fn type_name(&self) -> &'static str {
        match self {
            OptionValue::Number(_) => "number",
            OptionValue::Bytes(_) => "bytes",
        }
    }
}

/// Option mapping handed to the provider factory
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HashDigestOptions {
    values: BTreeMap<String, OptionValue>,
}

impl HashDigestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bytes(mut self, key: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(key, OptionValue::Bytes(bytes.into()));
        self
    }

    pub fn with_number(mut self, key: impl Into<String>, number: u64) -> Self {
        self.insert(key, OptionValue::Number(number));
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: OptionValue) -> Option<OptionValue> {
        self.values.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Read a byte-valued option, failing if it holds another type
    pub fn bytes(&self, key: &str) -> Result<Option<&[u8]>> {
        match self.values.get(key) {
            None => Ok(None),
            Some(OptionValue::Bytes(bytes)) => Ok(Some(bytes)),
            Some(other) => Err(MerkleError::invalid_option(
                key,
                format!("expected bytes, got {}", other.type_name()),
            )),
        }
    }

    /// Read a numeric option, failing if it holds another type
    pub fn number(&self, key: &str) -> Result<Option<u64>> {
        match self.values.get(key) {
            None => Ok(None),
            Some(OptionValue::Number(number)) => Ok(Some(*number)),
            Some(other) => Err(MerkleError::invalid_option(
                key,
                format!("expected number, got {}", other.type_name()),
            )),
        }
    }

    /// Reject keys that no provider understands
    pub fn ensure_recognized(&self) -> Result<()> {
        match self.keys().find(|key| !RECOGNIZED_OPTIONS.contains(key)) {
            Some(key) => Err(MerkleError::invalid_option(
                key,
                format!("unrecognized option, expected one of {:?}", RECOGNIZED_OPTIONS),
            )),
            None => Ok(()),
        }
    }
}

// Entropy is a secret and stays out of logs
impl fmt::Debug for HashDigestOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (key, value) in &self.values {
            if key == HASH_DIGEST_PROVIDER_ENTROPY_OPTION {
                map.entry(key, &"<redacted>");
            } else {
                map.entry(key, value);
            }
        }
        map.finish()
    }
}
