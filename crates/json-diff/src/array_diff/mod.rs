//! Identity-based array reconciliation.
//!
//! [`diff_by_identity`] turns one array into another using reference
//! identity ([`Value::same`]) rather than structural equality, so a specific
//! occurrence of a shared container is tracked as that occurrence. The
//! algorithm is greedy: it deletes surplus occurrences, then fills each
//! target slot by moving the earliest later occurrence into place or
//! inserting a fresh one. It does not look for a minimal edit distance.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use json_diff_path::{AddressError, Path};
use json_diff_util::{Identity, Value};

/// One step of an array edit script.
///
/// Indices refer to the array as it is when the edit is applied, after all
/// earlier edits of the same script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ArrayEdit {
    Delete { index: usize, value: Value },
    Insert { index: usize, value: Value },
    Move { from: usize, to: usize, value: Value },
}

/// Edit script turning `first` into `second`.
///
/// # Example
///
/// ```
/// use json_diff::array_diff::{apply_array_edits, diff_by_identity, ArrayEdit};
/// use json_diff_util::Value;
///
/// let a = Value::from("a");
/// let b = Value::from("b");
/// let c = Value::from("c");
/// let first = vec![a.clone(), b.clone(), c.clone()];
/// let second = vec![c.clone(), a.clone()];
///
/// let edits = diff_by_identity(&first, &second);
/// assert_eq!(
///     edits,
///     vec![
///         ArrayEdit::Delete { index: 1, value: b },
///         ArrayEdit::Move { from: 1, to: 0, value: c },
///     ]
/// );
/// assert_eq!(apply_array_edits(&first, &edits).unwrap(), second);
/// ```
pub fn diff_by_identity(first: &[Value], second: &[Value]) -> Vec<ArrayEdit> {
    let mut needed: HashMap<Identity, usize> = HashMap::new();
    for item in second {
        *needed.entry(item.identity()).or_default() += 1;
    }

    let mut edits = Vec::new();

    // surplus occurrences, earliest kept
    let mut seen: HashMap<Identity, usize> = HashMap::new();
    let mut surplus = Vec::new();
    for (i, item) in first.iter().enumerate() {
        let id = item.identity();
        let count = seen.entry(id.clone()).or_default();
        *count += 1;
        if *count > needed.get(&id).copied().unwrap_or(0) {
            surplus.push(i);
        }
    }
    let mut working = first.to_vec();
    for &i in surplus.iter().rev() {
        let value = working.remove(i);
        edits.push(ArrayEdit::Delete { index: i, value });
    }

    for (pos, want) in second.iter().enumerate() {
        if working.get(pos).is_some_and(|have| have.same(want)) {
            continue;
        }
        let found = working
            .iter()
            .enumerate()
            .skip(pos + 1)
            .find(|(_, have)| have.same(want))
            .map(|(j, _)| j);
        match found {
            Some(from) => {
                let value = working.remove(from);
                working.insert(pos, value.clone());
                edits.push(ArrayEdit::Move {
                    from,
                    to: pos,
                    value,
                });
            }
            None => {
                working.insert(pos, want.clone());
                edits.push(ArrayEdit::Insert {
                    index: pos,
                    value: want.clone(),
                });
            }
        }
    }
    edits
}

/// Replays an edit script produced by [`diff_by_identity`].
pub fn apply_array_edits(array: &[Value], edits: &[ArrayEdit]) -> Result<Vec<Value>, AddressError> {
    let mut out = array.to_vec();
    let out_of_bounds = |index: usize, len: usize| AddressError::IndexOutOfBounds {
        path: Path::root().index(index),
        index,
        len,
    };
    for edit in edits {
        match edit {
            ArrayEdit::Delete { index, .. } => {
                if *index >= out.len() {
                    return Err(out_of_bounds(*index, out.len()));
                }
                out.remove(*index);
            }
            ArrayEdit::Insert { index, value } => {
                if *index > out.len() {
                    return Err(out_of_bounds(*index, out.len()));
                }
                out.insert(*index, value.clone());
            }
            ArrayEdit::Move { from, to, .. } => {
                if *from >= out.len() || *to >= out.len() {
                    return Err(out_of_bounds((*from).max(*to), out.len()));
                }
                let value = out.remove(*from);
                out.insert(*to, value);
            }
        }
    }
    Ok(out)
}
