//! Invertible JSON patches with optimistic-concurrency guards.
//!
//! # Operations
//!
//! `add`, `replace` (guarded by `previous`), `remove` (guarded by the removed
//! `value`) and `move`. `copy` is recognised by the codec but is never
//! applied or inverted.

pub mod apply;
pub mod codec;
pub mod types;

pub use apply::{
    apply_op, apply_op_with, apply_ops, apply_ops_with, invert_op, invert_ops, revert_ops,
    revert_ops_with,
};
pub use codec::json::{from_json, from_json_patch, to_json, to_json_patch};
pub use types::{PatchError, PatchOp};
