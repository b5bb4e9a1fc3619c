//! Core types for the patch algebra.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use json_diff_path::AddressError;
pub use json_diff_path::Path;
use json_diff_util::Value;

// ── Error ─────────────────────────────────────────────────────────────────

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PatchError {
    #[error(transparent)]
    Address(#[from] AddressError),
    /// The optimistic-concurrency guard of `replace` tripped.
    #[error("PREVIOUS_MISMATCH: previous is different at {path}")]
    PreviousMismatch { path: Path },
    #[error("VALUE_MISMATCH: value to remove is different at {path}")]
    ValueMismatch { path: Path },
    #[error("MOVE_INTO_SELF: cannot move {from} into {path}")]
    MoveIntoSelf { from: Path, path: Path },
    #[error("UNSUPPORTED: {0}")]
    Unsupported(&'static str),
    #[error("INVALID_OP: {0}")]
    InvalidOp(String),
}

// ── Op enum ───────────────────────────────────────────────────────────────

/// One atomic, path-addressed edit.
///
/// Every variant except `Copy` carries enough information to be inverted.
/// The serde form is the persisted one (paths as segment arrays); see
/// [`codec::json`](super::codec::json) for the RFC 6902 pointer form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PatchOp {
    /// Insert `value`; an object key must be absent, an array index must be
    /// at most the length.
    Add { path: Path, value: Value },
    /// Overwrite the value at `path`, which must equal `previous`.
    Replace {
        path: Path,
        value: Value,
        previous: Value,
    },
    /// Delete the value at `path`, which must equal `value`.
    Remove { path: Path, value: Value },
    Move { from: Path, path: Path },
    /// Declared for data compatibility only; never applied or inverted.
    Copy { from: Path, path: Path },
}

impl PatchOp {
    /// Lowercase op name as used in the `op` field.
    pub fn op_name(&self) -> &'static str {
        match self {
            PatchOp::Add { .. } => "add",
            PatchOp::Replace { .. } => "replace",
            PatchOp::Remove { .. } => "remove",
            PatchOp::Move { .. } => "move",
            PatchOp::Copy { .. } => "copy",
        }
    }

    /// Target path of the op.
    pub fn path(&self) -> &Path {
        match self {
            PatchOp::Add { path, .. }
            | PatchOp::Replace { path, .. }
            | PatchOp::Remove { path, .. }
            | PatchOp::Move { path, .. }
            | PatchOp::Copy { path, .. } => path,
        }
    }

    /// Source path for `move`/`copy`.
    pub fn from(&self) -> Option<&Path> {
        match self {
            PatchOp::Move { from, .. } | PatchOp::Copy { from, .. } => Some(from),
            _ => None,
        }
    }

    /// Re-roots every path of the op under `prefix`.
    pub fn rebase(self, prefix: &Path) -> PatchOp {
        match self {
            PatchOp::Add { path, value } => PatchOp::Add {
                path: path.rebase(prefix),
                value,
            },
            PatchOp::Replace {
                path,
                value,
                previous,
            } => PatchOp::Replace {
                path: path.rebase(prefix),
                value,
                previous,
            },
            PatchOp::Remove { path, value } => PatchOp::Remove {
                path: path.rebase(prefix),
                value,
            },
            PatchOp::Move { from, path } => PatchOp::Move {
                from: from.rebase(prefix),
                path: path.rebase(prefix),
            },
            PatchOp::Copy { from, path } => PatchOp::Copy {
                from: from.rebase(prefix),
                path: path.rebase(prefix),
            },
        }
    }
}
