//! JSON codec for patch operations.
//!
//! Converts ops to/from `serde_json::Value` in RFC 6902 shape, extended with
//! the guard values: `replace` carries `previous` and `remove` carries the
//! removed `value`. Key-only paths are written as JSON Pointer strings; paths
//! with refinement segments are written as an explicit segment array.

use serde_json::{json, Map, Value as Json};

use json_diff_path::{Key, Path, PathSegment};
use json_diff_util::Value;

use crate::json_patch::types::{PatchError, PatchOp};

// ── Path helpers ──────────────────────────────────────────────────────────

fn encode_path(path: &Path) -> Json {
    match path.to_pointer() {
        Some(pointer) => Json::String(pointer),
        None => Json::Array(path.segments().iter().map(encode_segment).collect()),
    }
}

/// Same shape as the `Deserialize` impl of [`PathSegment`] reads back.
fn encode_segment(seg: &PathSegment) -> Json {
    match seg {
        PathSegment::Key(Key::Index(i)) => json!({ "key": i }),
        PathSegment::Key(Key::Field(s)) => json!({ "key": s }),
        PathSegment::Tag { name, value } => json!({ "tag": { "name": name, "value": value } }),
        PathSegment::Single(single) => json!({ "single": single }),
    }
}

fn decode_path(v: &Json) -> Result<Path, PatchError> {
    match v {
        Json::String(pointer) => Ok(Path::from_pointer(pointer)),
        Json::Array(_) => serde_json::from_value(v.clone())
            .map_err(|e| PatchError::InvalidOp(format!("bad path segments: {e}"))),
        _ => Err(PatchError::InvalidOp(
            "path must be a string or a segment array".into(),
        )),
    }
}

fn field<'a>(obj: &'a Map<String, Json>, name: &str) -> Result<&'a Json, PatchError> {
    obj.get(name)
        .ok_or_else(|| PatchError::InvalidOp(format!("missing field \"{name}\"")))
}

// ── Serialization ─────────────────────────────────────────────────────────

/// Serialize a `PatchOp` to a `serde_json::Value`.
pub fn to_json(op: &PatchOp) -> Json {
    match op {
        PatchOp::Add { path, value } => json!({
            "op": "add",
            "path": encode_path(path),
            "value": value.to_json()
        }),
        PatchOp::Replace {
            path,
            value,
            previous,
        } => json!({
            "op": "replace",
            "path": encode_path(path),
            "value": value.to_json(),
            "previous": previous.to_json()
        }),
        PatchOp::Remove { path, value } => json!({
            "op": "remove",
            "path": encode_path(path),
            "value": value.to_json()
        }),
        PatchOp::Move { from, path } => json!({
            "op": "move",
            "path": encode_path(path),
            "from": encode_path(from)
        }),
        PatchOp::Copy { from, path } => json!({
            "op": "copy",
            "path": encode_path(path),
            "from": encode_path(from)
        }),
    }
}

/// Serialize a patch list to a JSON array.
pub fn to_json_patch(ops: &[PatchOp]) -> Json {
    Json::Array(ops.iter().map(to_json).collect())
}

// ── Deserialization ───────────────────────────────────────────────────────

/// Deserialize one op.
pub fn from_json(v: &Json) -> Result<PatchOp, PatchError> {
    let obj = v
        .as_object()
        .ok_or_else(|| PatchError::InvalidOp("op must be an object".into()))?;
    let op = field(obj, "op")?
        .as_str()
        .ok_or_else(|| PatchError::InvalidOp("op must be a string".into()))?;
    let path = decode_path(field(obj, "path")?)?;
    let value = || field(obj, "value").map(Value::from);
    match op {
        "add" => Ok(PatchOp::Add {
            path,
            value: value()?,
        }),
        "replace" => Ok(PatchOp::Replace {
            path,
            value: value()?,
            previous: Value::from(field(obj, "previous")?),
        }),
        "remove" => Ok(PatchOp::Remove {
            path,
            value: value()?,
        }),
        "move" => Ok(PatchOp::Move {
            from: decode_path(field(obj, "from")?)?,
            path,
        }),
        "copy" => Ok(PatchOp::Copy {
            from: decode_path(field(obj, "from")?)?,
            path,
        }),
        other => Err(PatchError::InvalidOp(format!("unknown op: {other}"))),
    }
}

/// Deserialize a JSON array of ops.
pub fn from_json_patch(v: &Json) -> Result<Vec<PatchOp>, PatchError> {
    v.as_array()
        .ok_or_else(|| PatchError::InvalidOp("patch must be an array".into()))?
        .iter()
        .map(from_json)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_uses_pointer_and_previous() {
        let op = PatchOp::Replace {
            path: Path::root().key("meta").key("a/b"),
            value: Value::from(2),
            previous: Value::from(1),
        };
        assert_eq!(
            to_json(&op),
            json!({"op": "replace", "path": "/meta/a~1b", "value": 2, "previous": 1})
        );
    }

    #[test]
    fn refined_path_becomes_segment_array() {
        let op = PatchOp::Add {
            path: Path::root().key("shape").tag("type", "circle").key("r"),
            value: Value::from(3),
        };
        let encoded = to_json(&op);
        assert_eq!(
            encoded["path"],
            json!([
                {"key": "shape"},
                {"tag": {"name": "type", "value": "circle"}},
                {"key": "r"}
            ])
        );
        assert_eq!(from_json(&encoded).unwrap(), op);
    }

    #[test]
    fn segment_array_matches_serde_shape() {
        let path = Path::root()
            .key("items")
            .index(2)
            .single(false)
            .tag("kind", "note")
            .key("-");
        let op = PatchOp::Remove {
            path: path.clone(),
            value: Value::Null,
        };
        let encoded = to_json(&op);
        assert_eq!(
            encoded["path"],
            json!([
                {"key": "items"},
                {"key": 2},
                {"single": false},
                {"tag": {"name": "kind", "value": "note"}},
                {"key": "-"}
            ])
        );
        for seg in path.segments() {
            assert_eq!(encode_segment(seg), serde_json::to_value(seg).unwrap());
        }
        assert_eq!(from_json(&encoded).unwrap(), op);
    }

    #[test]
    fn decodes_rfc_shapes() {
        let ops = from_json_patch(&json!([
            {"op": "add", "path": "/a", "value": {"b": [1]}},
            {"op": "remove", "path": "/c/0", "value": "x"},
            {"op": "move", "from": "/a", "path": "/d"},
            {"op": "copy", "from": "/d", "path": "/e"}
        ]))
        .unwrap();
        assert_eq!(ops.len(), 4);
        assert_eq!(ops[1].path(), &Path::from_pointer("/c/0"));
        assert_eq!(ops[2].from(), Some(&Path::root().key("a")));
        assert_eq!(ops[3].op_name(), "copy");
    }

    #[test]
    fn rejects_malformed_ops() {
        for bad in [
            json!({"op": "replace", "path": "/a", "value": 1}),
            json!({"op": "remove", "path": "/a"}),
            json!({"op": "test", "path": "/a", "value": 1}),
            json!({"op": "add", "path": 3, "value": 1}),
            json!(["add"]),
        ] {
            assert!(matches!(from_json(&bad), Err(PatchError::InvalidOp(_))), "{bad}");
        }
        assert!(from_json_patch(&json!({"op": "add"})).is_err());
    }
}
