//! json-diff-util - Value model and utility functions for json-diff
//!
//! This crate provides the persistent [`Value`] type shared by every other
//! json-diff crate, together with its identity and equality helpers.

pub mod json_equal;
pub mod value;

// Re-exports for convenience
pub use json_equal::{deep_equal, EqualFn};
pub use value::{Identity, Object, Value};
