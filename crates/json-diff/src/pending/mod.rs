//! Pending ops: caller intents that still lack state-dependent details.
//!
//! A [`PendingOp`] leaves out whatever has to be read from the live document
//! (the `previous` of a replace, the removed value, the next array index).
//! [`resolve_and_apply`] fills those in one op at a time against a running
//! value, so later intents see the effect of earlier ones.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tracing::trace;

use json_diff_path::{delete_at_end, get, AddressError, Path};
use json_diff_util::{deep_equal, EqualFn, Value};

use crate::json_patch::{apply_op_with, PatchError, PatchOp};

/// Callback of a [`PendingOp::Nested`] intent. Receives the value currently
/// at the nested path (if any) and returns sub-intents relative to it.
pub type MakeFn = Arc<dyn Fn(Option<&Value>) -> Vec<PendingOp> + Send + Sync>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ResolveError {
    #[error(transparent)]
    Address(#[from] AddressError),
    #[error(transparent)]
    Patch(#[from] PatchError),
    #[error("ALREADY_EXISTS: something is already at {path}")]
    AlreadyExists { path: Path },
    #[error("NOTHING_THERE: nothing at {path}")]
    NothingThere { path: Path },
    #[error("NOT_AN_ARRAY: cannot push onto {found} at {path}")]
    NotAnArray { path: Path, found: &'static str },
    #[error("UNRESOLVABLE: {0} intents expand to several ops; use resolve_and_apply")]
    Unresolvable(&'static str),
}

/// A caller intent, resolved into a [`PatchOp`] against live state.
#[derive(Clone)]
pub enum PendingOp {
    Add { path: Path, value: Value },
    /// Becomes an `Add` if nothing is at `path` yet.
    Replace { path: Path, value: Value },
    Remove { path: Path },
    /// Append to the array at `path`; the index is read at resolution time.
    Push { path: Path, value: Value },
    Move { from: Path, path: Path },
    /// Defer building sub-intents until the value at `path` is known.
    Nested { path: Path, make: MakeFn },
    /// Several intents, resolved in order.
    Batch(Vec<PendingOp>),
}

impl PendingOp {
    /// Builds a [`PendingOp::Nested`] from a closure.
    pub fn nested<F>(path: Path, make: F) -> Self
    where
        F: Fn(Option<&Value>) -> Vec<PendingOp> + Send + Sync + 'static,
    {
        PendingOp::Nested {
            path,
            make: Arc::new(make),
        }
    }

    /// Re-roots the intent (and every intent it contains) under `prefix`.
    pub fn rebase(self, prefix: &Path) -> PendingOp {
        match self {
            PendingOp::Add { path, value } => PendingOp::Add {
                path: path.rebase(prefix),
                value,
            },
            PendingOp::Replace { path, value } => PendingOp::Replace {
                path: path.rebase(prefix),
                value,
            },
            PendingOp::Remove { path } => PendingOp::Remove {
                path: path.rebase(prefix),
            },
            PendingOp::Push { path, value } => PendingOp::Push {
                path: path.rebase(prefix),
                value,
            },
            PendingOp::Move { from, path } => PendingOp::Move {
                from: from.rebase(prefix),
                path: path.rebase(prefix),
            },
            PendingOp::Nested { path, make } => PendingOp::Nested {
                path: path.rebase(prefix),
                make,
            },
            PendingOp::Batch(ops) => {
                PendingOp::Batch(ops.into_iter().map(|op| op.rebase(prefix)).collect())
            }
        }
    }
}

impl fmt::Debug for PendingOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PendingOp::Add { path, value } => f
                .debug_struct("Add")
                .field("path", path)
                .field("value", value)
                .finish(),
            PendingOp::Replace { path, value } => f
                .debug_struct("Replace")
                .field("path", path)
                .field("value", value)
                .finish(),
            PendingOp::Remove { path } => f.debug_struct("Remove").field("path", path).finish(),
            PendingOp::Push { path, value } => f
                .debug_struct("Push")
                .field("path", path)
                .field("value", value)
                .finish(),
            PendingOp::Move { from, path } => f
                .debug_struct("Move")
                .field("from", from)
                .field("path", path)
                .finish(),
            PendingOp::Nested { path, .. } => f
                .debug_struct("Nested")
                .field("path", path)
                .finish_non_exhaustive(),
            PendingOp::Batch(ops) => f.debug_tuple("Batch").field(ops).finish(),
        }
    }
}

impl From<Vec<PendingOp>> for PendingOp {
    fn from(ops: Vec<PendingOp>) -> Self {
        PendingOp::Batch(ops)
    }
}

/// Result of [`resolve_and_apply`].
#[derive(Debug, Clone)]
pub struct Resolved {
    /// Document after every resolved op.
    pub value: Value,
    /// Concrete ops in application order.
    pub changes: Vec<PatchOp>,
}

/// Resolve a single, non-composite intent against `current`.
pub fn from_pending(current: &Value, op: &PendingOp) -> Result<PatchOp, ResolveError> {
    match op {
        PendingOp::Add { path, value } => {
            ensure_vacant(current, path)?;
            Ok(PatchOp::Add {
                path: concrete_append(current, path)?,
                value: value.clone(),
            })
        }
        PendingOp::Replace { path, value } => Ok(match get(current, path)? {
            Some(previous) => PatchOp::Replace {
                path: path.clone(),
                value: value.clone(),
                previous: previous.clone(),
            },
            None => PatchOp::Add {
                path: path.clone(),
                value: value.clone(),
            },
        }),
        PendingOp::Remove { path } => match get(current, path)? {
            Some(existing) => Ok(PatchOp::Remove {
                path: path.clone(),
                value: existing.clone(),
            }),
            None => Err(ResolveError::NothingThere { path: path.clone() }),
        },
        PendingOp::Push { path, value } => match get(current, path)? {
            Some(Value::Array(items)) => Ok(PatchOp::Add {
                path: path.clone().index(items.len()),
                value: value.clone(),
            }),
            Some(other) => Err(ResolveError::NotAnArray {
                path: path.clone(),
                found: other.type_name(),
            }),
            None => Err(ResolveError::NothingThere { path: path.clone() }),
        },
        PendingOp::Move { from, path } => {
            if get(current, from)?.is_none() {
                return Err(ResolveError::NothingThere { path: from.clone() });
            }
            // the end of the destination array is measured without the source
            let (without, _) = delete_at_end(current, from)?;
            Ok(PatchOp::Move {
                from: from.clone(),
                path: concrete_append(&without, path)?,
            })
        }
        PendingOp::Nested { .. } => Err(ResolveError::Unresolvable("nested")),
        PendingOp::Batch(_) => Err(ResolveError::Unresolvable("batch")),
    }
}

/// Object keys must be absent; array indices are insertion points and the
/// root always exists.
fn ensure_vacant(current: &Value, path: &Path) -> Result<(), ResolveError> {
    let Some((parent, key, _)) = path.split_last_key() else {
        return Err(ResolveError::AlreadyExists { path: path.clone() });
    };
    let container = get(current, &Path::from_segments(parent.to_vec()))?;
    if let Some(Value::Object(map)) = container {
        if map.contains_key(key.as_field().as_ref()) {
            return Err(ResolveError::AlreadyExists { path: path.clone() });
        }
    }
    Ok(())
}

/// Rewrites a trailing `-` key into the index one past the end of the array
/// it addresses in `value`, so the recorded op can be inverted. Paths into
/// objects keep `-` as a plain field name.
fn concrete_append(value: &Value, path: &Path) -> Result<Path, ResolveError> {
    let Some((parent, key, trailing)) = path.split_last_key() else {
        return Ok(path.clone());
    };
    if !key.is_append() {
        return Ok(path.clone());
    }
    let parent = Path::from_segments(parent.to_vec());
    match get(value, &parent)? {
        Some(Value::Array(items)) => {
            let len = items.len();
            Ok(parent.index(len).join(&Path::from_segments(trailing.to_vec())))
        }
        _ => Ok(path.clone()),
    }
}

/// Resolves and applies `ops` in order, threading the running value.
///
/// `Nested` intents call their `make` with the value at their path as it is
/// at that point, and their sub-intents are rebased under that path.
/// `Batch` intents are flattened in place. Nothing is modified on failure.
///
/// # Example
///
/// ```
/// use json_diff::pending::{resolve_and_apply, PendingOp};
/// use json_diff_path::Path;
/// use json_diff_util::{deep_equal, Value};
/// use serde_json::json;
///
/// let doc = Value::from(json!({"tags": ["draft"]}));
/// let tags = Path::root().key("tags");
/// let ops = vec![
///     PendingOp::Push { path: tags.clone(), value: Value::from("a") },
///     PendingOp::Push { path: tags.clone(), value: Value::from("b") },
/// ];
/// let resolved = resolve_and_apply(&doc, &ops, deep_equal).unwrap();
/// assert_eq!(resolved.changes[0].path(), &tags.clone().index(1));
/// assert_eq!(resolved.changes[1].path(), &tags.clone().index(2));
/// assert_eq!(resolved.value.to_json(), json!({"tags": ["draft", "a", "b"]}));
/// ```
pub fn resolve_and_apply(
    current: &Value,
    ops: &[PendingOp],
    equal: EqualFn,
) -> Result<Resolved, ResolveError> {
    let mut acc = Resolved {
        value: current.clone(),
        changes: Vec::new(),
    };
    resolve_into(&mut acc, ops, equal)?;
    Ok(acc)
}

/// [`resolve_and_apply`] with structural equality.
pub fn resolve(current: &Value, ops: &[PendingOp]) -> Result<Resolved, ResolveError> {
    resolve_and_apply(current, ops, deep_equal)
}

fn resolve_into(acc: &mut Resolved, ops: &[PendingOp], equal: EqualFn) -> Result<(), ResolveError> {
    for op in ops {
        match op {
            PendingOp::Batch(inner) => resolve_into(acc, inner, equal)?,
            PendingOp::Nested { path, make } => {
                let sub: Vec<PendingOp> = make(get(&acc.value, path)?)
                    .into_iter()
                    .map(|op| op.rebase(path))
                    .collect();
                resolve_into(acc, &sub, equal)?;
            }
            simple => {
                let patch = from_pending(&acc.value, simple)?;
                trace!(op = patch.op_name(), path = %patch.path(), "resolved pending op");
                acc.value = apply_op_with(&acc.value, &patch, equal)?;
                acc.changes.push(patch);
            }
        }
    }
    Ok(())
}
