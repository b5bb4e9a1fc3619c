//! json-diff: branching, patch-based state history over persistent JSON
//! values.
//!
//! Layers, bottom up:
//!
//! - [`json_patch`]: invertible patch operations and their JSON codec
//! - [`array_diff`]: identity-based array edit scripts
//! - [`json_patch_diff`]: structural inference of a patch between two values
//! - [`pending`]: resolution of caller intents against live state
//! - [`builder`]: ergonomic construction of intents
//! - [`history`]: the branching history tree with undo, redo and jump
//! - [`cli`]: logic behind the `json-diff` and `json-patch` binaries
//!
//! Path addressing lives in `json_diff_path`; the value model and equality in
//! `json_diff_util`.

pub mod array_diff;
pub mod builder;
pub mod cli;
pub mod history;
pub mod json_patch;
pub mod json_patch_diff;
pub mod pending;

pub use builder::{Editor, OpKind, PathBuilder};
pub use history::{Action, History, HistoryError, HistoryNode, HistoryOptions, IdGenerator, NodeId};
pub use json_diff_path::{Key, Path, PathSegment};
pub use json_diff_util::Value;
pub use json_patch::{PatchError, PatchOp};
pub use json_patch_diff::infer_patch;
pub use pending::{PendingOp, ResolveError};
