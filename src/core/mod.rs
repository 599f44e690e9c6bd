//! Core types and utilities for merkle_digest
//!
//! This module contains the hash value type, the supported base algorithms
//! and the error type used throughout the crate.

pub mod error;
pub mod hash;
pub mod types;

// Re-export commonly used items
pub use error::{MerkleError, Result};
pub use hash::{DigestAlgorithm, BANNED_ALGORITHMS};
pub use types::{HashValue, IndexedMerkleLeaf};
