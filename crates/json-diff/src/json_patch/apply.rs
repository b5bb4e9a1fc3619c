//! Patch application and inversion.
//!
//! Application is persistent: the input document is never modified and the
//! returned document shares every subtree the op did not touch.

use json_diff_path::{
    delete_at_end, get, get_existing, insert_at_end, set_at_end, AddressError, Path,
};
use json_diff_util::{deep_equal, EqualFn, Value};

use super::types::{PatchError, PatchOp};

// ── Individual operation applicators ─────────────────────────────────────

fn apply_replace(
    doc: &Value,
    op_path: &Path,
    value: &Value,
    previous: &Value,
    equal: EqualFn,
) -> Result<Value, PatchError> {
    match get(doc, op_path)? {
        Some(current) if equal(current, previous) => {
            let (next, _) = set_at_end(doc, op_path, value.clone())?;
            Ok(next)
        }
        _ => Err(PatchError::PreviousMismatch {
            path: op_path.clone(),
        }),
    }
}

fn apply_remove(
    doc: &Value,
    op_path: &Path,
    value: &Value,
    equal: EqualFn,
) -> Result<Value, PatchError> {
    let op_path = &last_element(doc, op_path)?;
    let current = get_existing(doc, op_path)?;
    if !equal(current, value) {
        return Err(PatchError::ValueMismatch {
            path: op_path.clone(),
        });
    }
    let (next, _) = delete_at_end(doc, op_path)?;
    Ok(next)
}

fn apply_move(doc: &Value, from: &Path, op_path: &Path) -> Result<Value, PatchError> {
    let from = &last_element(doc, from)?;
    if op_path.starts_with(from) {
        if op_path.len() == from.len() {
            get_existing(doc, from)?;
            return Ok(doc.clone());
        }
        return Err(PatchError::MoveIntoSelf {
            from: from.clone(),
            path: op_path.clone(),
        });
    }
    let (without, value) = delete_at_end(doc, from)?;
    Ok(insert_at_end(&without, op_path, value)?)
}

/// Reads a trailing `-` on a source path as the last element of its array.
///
/// `-` inserts past the end, so the inverse of an append (a remove, or a
/// move back out) has to name the element the append produced.
fn last_element(doc: &Value, path: &Path) -> Result<Path, PatchError> {
    let Some((parent, key, trailing)) = path.split_last_key() else {
        return Ok(path.clone());
    };
    if !key.is_append() {
        return Ok(path.clone());
    }
    let parent = Path::from_segments(parent.to_vec());
    let last = match get(doc, &parent)? {
        Some(Value::Array(items)) => items.len().checked_sub(1),
        _ => return Ok(path.clone()),
    };
    let last = last.ok_or_else(|| AddressError::NotFound { path: path.clone() })?;
    Ok(parent.index(last).join(&Path::from_segments(trailing.to_vec())))
}

// ── Public API ────────────────────────────────────────────────────────────

/// Applies one op using structural equality for the guards.
///
/// # Example
///
/// ```
/// use json_diff::json_patch::{apply_op, PatchError, PatchOp};
/// use json_diff_path::Path;
/// use json_diff_util::Value;
/// use serde_json::json;
///
/// let doc = Value::from(json!({"title": "First Draft"}));
/// let op = PatchOp::Replace {
///     path: Path::root().key("title"),
///     value: Value::from("Revised"),
///     previous: Value::from("First Draft"),
/// };
/// let next = apply_op(&doc, &op).unwrap();
/// assert_eq!(next.get("title"), Some(&Value::from("Revised")));
///
/// // applying the same op again trips the concurrency guard
/// assert!(matches!(apply_op(&next, &op), Err(PatchError::PreviousMismatch { .. })));
/// ```
pub fn apply_op(doc: &Value, op: &PatchOp) -> Result<Value, PatchError> {
    apply_op_with(doc, op, deep_equal)
}

/// Applies one op, comparing guard values with `equal`.
pub fn apply_op_with(doc: &Value, op: &PatchOp, equal: EqualFn) -> Result<Value, PatchError> {
    match op {
        PatchOp::Add { path, value } => Ok(insert_at_end(doc, path, value.clone())?),
        PatchOp::Replace {
            path,
            value,
            previous,
        } => apply_replace(doc, path, value, previous, equal),
        PatchOp::Remove { path, value } => apply_remove(doc, path, value, equal),
        PatchOp::Move { from, path } => apply_move(doc, from, path),
        PatchOp::Copy { .. } => Err(PatchError::Unsupported("copy")),
    }
}

/// Applies `ops` in order. Fails on the first op that fails; the input is
/// left untouched either way.
pub fn apply_ops(doc: &Value, ops: &[PatchOp]) -> Result<Value, PatchError> {
    apply_ops_with(doc, ops, deep_equal)
}

pub fn apply_ops_with(doc: &Value, ops: &[PatchOp], equal: EqualFn) -> Result<Value, PatchError> {
    ops.iter().try_fold(doc.clone(), |acc, op| apply_op_with(&acc, op, equal))
}

/// Undoes `ops`: inverts each and applies them last to first.
pub fn revert_ops(doc: &Value, ops: &[PatchOp]) -> Result<Value, PatchError> {
    revert_ops_with(doc, ops, deep_equal)
}

pub fn revert_ops_with(doc: &Value, ops: &[PatchOp], equal: EqualFn) -> Result<Value, PatchError> {
    ops.iter().rev().try_fold(doc.clone(), |acc, op| {
        let inverse = invert_op(op)?;
        apply_op_with(&acc, &inverse, equal)
    })
}

/// The op that undoes `op`.
///
/// `Add` and `Remove` swap, `Replace` swaps `value` and `previous`, `Move`
/// swaps `from` and `path`. `Copy` has no inverse.
pub fn invert_op(op: &PatchOp) -> Result<PatchOp, PatchError> {
    match op {
        PatchOp::Add { path, value } => Ok(PatchOp::Remove {
            path: path.clone(),
            value: value.clone(),
        }),
        PatchOp::Remove { path, value } => Ok(PatchOp::Add {
            path: path.clone(),
            value: value.clone(),
        }),
        PatchOp::Replace {
            path,
            value,
            previous,
        } => Ok(PatchOp::Replace {
            path: path.clone(),
            value: previous.clone(),
            previous: value.clone(),
        }),
        PatchOp::Move { from, path } => Ok(PatchOp::Move {
            from: path.clone(),
            path: from.clone(),
        }),
        PatchOp::Copy { .. } => Err(PatchError::Unsupported("copy")),
    }
}

/// Inverse of a whole patch list, in application order.
pub fn invert_ops(ops: &[PatchOp]) -> Result<Vec<PatchOp>, PatchError> {
    ops.iter().rev().map(invert_op).collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────
