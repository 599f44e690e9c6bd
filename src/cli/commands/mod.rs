//! CLI command implementations

pub mod completion;
pub mod prove;
pub mod root;
pub mod size_proof;
pub mod verify;
