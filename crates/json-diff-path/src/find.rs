use json_diff_util::Value;

use crate::types::{Key, Path, PathSegment};
use crate::AddressError;

/// Resolve `path` against `root` without modifying anything.
///
/// Returns `Ok(None)` when the final key is simply absent (a missing object
/// property or an index past the end). Descending *through* a missing or
/// `null` value is an error, as is any failed refinement.
///
/// # Example
///
/// ```
/// use json_diff_path::{get, Path};
/// use json_diff_util::Value;
/// use serde_json::json;
///
/// let doc = Value::from(json!({"shape": {"type": "circle", "r": 2}}));
/// let r = get(&doc, &Path::root().key("shape").tag("type", "circle").key("r")).unwrap();
/// assert_eq!(r, Some(&Value::from(2)));
///
/// let missing = get(&doc, &Path::root().key("nope")).unwrap();
/// assert_eq!(missing, None);
/// ```
pub fn get<'a>(root: &'a Value, path: &Path) -> Result<Option<&'a Value>, AddressError> {
    let segments = path.segments();
    let mut current = Some(root);
    for (i, seg) in segments.iter().enumerate() {
        let at = || Path::from_segments(segments[..=i].to_vec());
        current = match seg {
            PathSegment::Key(key) => match current {
                Some(base) if !base.is_null() => child(base, key, &at)?,
                _ => return Err(AddressError::MissingBase { path: at() }),
            },
            PathSegment::Tag { name, value } => {
                check_tag(current, name, value, &at)?;
                current
            }
            PathSegment::Single(is_single) => {
                check_single(current, *is_single, &at)?;
                current
            }
        };
    }
    Ok(current)
}

/// Like [`get`], but a missing target is an error too.
pub fn get_existing<'a>(root: &'a Value, path: &Path) -> Result<&'a Value, AddressError> {
    get(root, path)?.ok_or_else(|| AddressError::NotFound { path: path.clone() })
}

/// One key step from an existing container.
pub(crate) fn child<'a>(
    base: &'a Value,
    key: &Key,
    at: &dyn Fn() -> Path,
) -> Result<Option<&'a Value>, AddressError> {
    match base {
        Value::Array(items) => {
            let idx = key.as_index().ok_or_else(|| AddressError::InvalidArrayKey {
                key: key.to_string(),
                path: at(),
            })?;
            Ok(items.get(idx))
        }
        Value::Object(map) => Ok(map.get(key.as_field().as_ref())),
        Value::Null => Err(AddressError::MissingBase { path: at() }),
        other => Err(AddressError::NotAnObject {
            path: at(),
            found: other.type_name(),
        }),
    }
}

pub(crate) fn check_tag(
    current: Option<&Value>,
    name: &str,
    expected: &str,
    at: &dyn Fn() -> Path,
) -> Result<(), AddressError> {
    let base = match current {
        Some(v) if !v.is_null() => v,
        _ => return Err(AddressError::MissingBase { path: at() }),
    };
    match base.get(name) {
        Some(Value::String(found)) if found.as_ref() == expected => Ok(()),
        Some(Value::String(found)) => Err(AddressError::WrongTag {
            path: at(),
            expected: expected.to_string(),
            found: found.to_string(),
        }),
        _ => Err(AddressError::NotTaggedUnion {
            path: at(),
            name: name.to_string(),
        }),
    }
}

pub(crate) fn check_single(
    current: Option<&Value>,
    is_single: bool,
    at: &dyn Fn() -> Path,
) -> Result<(), AddressError> {
    let base = current.ok_or_else(|| AddressError::MissingBase { path: at() })?;
    if base.is_array() == is_single {
        return Err(AddressError::WrongShape {
            path: at(),
            expected_single: is_single,
        });
    }
    Ok(())
}

/// Asserts every refinement in `segments` against `value`.
pub(crate) fn check_refinements(
    value: Option<&Value>,
    segments: &[PathSegment],
    at: &dyn Fn() -> Path,
) -> Result<(), AddressError> {
    for seg in segments {
        match seg {
            PathSegment::Tag { name, value: tag } => check_tag(value, name, tag, at)?,
            PathSegment::Single(is_single) => check_single(value, *is_single, at)?,
            PathSegment::Key(_) => {}
        }
    }
    Ok(())
}
