//! JSON equality utilities.
//!
//! Provides deep equality comparison functions for [`Value`](crate::Value).

mod deep_equal;

pub use deep_equal::{deep_equal, EqualFn};
