//! Copy-on-write writers.
//!
//! Every function here takes the current root by reference and hands back a
//! new root. Only the containers on the way to the target are shallow-copied;
//! everything else is shared with the input.

use std::sync::Arc;

use json_diff_util::Value;

use crate::find::check_refinements;
use crate::types::{Key, Path, PathSegment};
use crate::AddressError;

/// Clones `root`, walks `path` with copy-on-write, and lets `f` edit the
/// value found there.
///
/// The input is never modified. Fails with `MissingBase` if the path does not
/// lead to an existing value.
pub fn get_cloned<R, E, F>(root: &Value, path: &Path, f: F) -> Result<(Value, R), E>
where
    E: From<AddressError>,
    F: FnOnce(&mut Value) -> Result<R, E>,
{
    let mut next = root.clone();
    let target = descend_mut(&mut next, path.segments())?;
    let out = f(target)?;
    Ok((next, out))
}

/// Writes `value` at `path`, overwriting whatever is there.
///
/// Returns the new root and the previous value, if any. On arrays an index
/// equal to the length (or `-`) appends. The empty path replaces the whole
/// document.
pub fn set_at_end(
    root: &Value,
    path: &Path,
    value: Value,
) -> Result<(Value, Option<Value>), AddressError> {
    let Some((parent, key, trailing)) = path.split_last_key() else {
        check_refinements(Some(root), path.segments(), &|| path.clone())?;
        return Ok((value, Some(root.clone())));
    };
    let key_path = path.prefix(parent.len() + 1);
    let parent = Path::from_segments(parent.to_vec());
    get_cloned(root, &parent, |container| match container {
        Value::Object(map) => {
            let field = key.as_field();
            let old = map.get(field.as_ref());
            check_refinements(old.or(Some(&value)), trailing, &|| path.clone())?;
            Ok(Arc::make_mut(map).insert(field.into_owned(), value))
        }
        Value::Array(items) => {
            let len = items.len();
            let idx = array_position(key, len, &key_path)?;
            check_refinements(items.get(idx).or(Some(&value)), trailing, &|| path.clone())?;
            let items = Arc::make_mut(items);
            if idx < len {
                Ok(Some(std::mem::replace(&mut items[idx], value)))
            } else if idx == len {
                items.push(value);
                Ok(None)
            } else {
                Err(AddressError::IndexOutOfBounds {
                    path: key_path.clone(),
                    index: idx,
                    len,
                })
            }
        }
        other => Err(not_a_container(other, &key_path)),
    })
}

/// Inserts `value` at `path` without overwriting.
///
/// Objects reject an existing key with `KeyExists`. Arrays shift later
/// elements right; `-` or an index equal to the length appends.
pub fn insert_at_end(root: &Value, path: &Path, value: Value) -> Result<Value, AddressError> {
    let (parent, key, trailing) = path.split_last_key().ok_or(AddressError::RootTarget)?;
    check_refinements(Some(&value), trailing, &|| path.clone())?;
    let key_path = path.prefix(parent.len() + 1);
    let parent = Path::from_segments(parent.to_vec());
    get_cloned(root, &parent, |container| match container {
        Value::Object(map) => {
            let field = key.as_field();
            if map.contains_key(field.as_ref()) {
                return Err(AddressError::KeyExists {
                    path: key_path.clone(),
                });
            }
            Arc::make_mut(map).insert(field.into_owned(), value);
            Ok(())
        }
        Value::Array(items) => {
            let len = items.len();
            let idx = array_position(key, len, &key_path)?;
            if idx > len {
                return Err(AddressError::IndexOutOfBounds {
                    path: key_path.clone(),
                    index: idx,
                    len,
                });
            }
            Arc::make_mut(items).insert(idx, value);
            Ok(())
        }
        other => Err(not_a_container(other, &key_path)),
    })
    .map(|(next, ())| next)
}

/// Removes the value at `path`, returning the new root and what was removed.
///
/// Object keys keep the relative order of the remaining entries; array
/// elements after the index shift left.
pub fn delete_at_end(root: &Value, path: &Path) -> Result<(Value, Value), AddressError> {
    let (parent, key, trailing) = path.split_last_key().ok_or(AddressError::RootTarget)?;
    let key_path = path.prefix(parent.len() + 1);
    let parent = Path::from_segments(parent.to_vec());
    let not_found = || AddressError::NotFound { path: path.clone() };
    get_cloned(root, &parent, |container| match container {
        Value::Object(map) => {
            let field = key.as_field();
            let old = map.get(field.as_ref()).ok_or_else(not_found)?;
            check_refinements(Some(old), trailing, &|| path.clone())?;
            Arc::make_mut(map)
                .shift_remove(field.as_ref())
                .ok_or_else(not_found)
        }
        Value::Array(items) => {
            let idx = key.as_index().ok_or_else(|| AddressError::InvalidArrayKey {
                key: key.to_string(),
                path: key_path.clone(),
            })?;
            let old = items.get(idx).ok_or_else(not_found)?;
            check_refinements(Some(old), trailing, &|| path.clone())?;
            Ok(Arc::make_mut(items).remove(idx))
        }
        other => Err(not_a_container(other, &key_path)),
    })
}

fn descend_mut<'a>(
    mut cur: &'a mut Value,
    segments: &[PathSegment],
) -> Result<&'a mut Value, AddressError> {
    for (i, seg) in segments.iter().enumerate() {
        let at = || Path::from_segments(segments[..=i].to_vec());
        match seg {
            PathSegment::Key(key) => {
                cur = match cur {
                    Value::Object(map) => Arc::make_mut(map)
                        .get_mut(key.as_field().as_ref())
                        .ok_or_else(|| AddressError::MissingBase { path: at() })?,
                    Value::Array(items) => {
                        let idx = key.as_index().ok_or_else(|| AddressError::InvalidArrayKey {
                            key: key.to_string(),
                            path: at(),
                        })?;
                        Arc::make_mut(items)
                            .get_mut(idx)
                            .ok_or_else(|| AddressError::MissingBase { path: at() })?
                    }
                    other => return Err(not_a_container(other, &at())),
                };
            }
            refinement => check_refinements(Some(&*cur), std::slice::from_ref(refinement), &at)?,
        }
    }
    Ok(cur)
}

fn array_position(key: &Key, len: usize, key_path: &Path) -> Result<usize, AddressError> {
    if key.is_append() {
        return Ok(len);
    }
    key.as_index().ok_or_else(|| AddressError::InvalidArrayKey {
        key: key.to_string(),
        path: key_path.clone(),
    })
}

fn not_a_container(value: &Value, path: &Path) -> AddressError {
    match value {
        Value::Null => AddressError::MissingBase { path: path.clone() },
        other => AddressError::NotAnObject {
            path: path.clone(),
            found: other.type_name(),
        },
    }
}
