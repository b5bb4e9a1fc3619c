//! Patch serialization formats.

pub mod json;
