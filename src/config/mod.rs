//! Digest provider configuration
//!
//! Describes which algorithm, provider variant and options to use, stored as
//! TOML with byte options hex encoded.

pub mod digest_config;

// Re-export commonly used items
pub use digest_config::{DigestConfig, DigestOptionsConfig};
