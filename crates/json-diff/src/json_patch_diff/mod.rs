//! Structural patch inference: generate a patch from two snapshots.

use json_diff_path::Path;
use json_diff_util::{Object, Value};

use crate::array_diff::{diff_by_identity, ArrayEdit};
use crate::json_patch::PatchOp;

// ── Public API ────────────────────────────────────────────────────────────

/// Generate an ordered patch that transforms `pre` into `post`.
///
/// Shared subtrees are skipped without being walked. Arrays are reconciled
/// by identity, objects key by key, and anything else becomes a `replace`
/// carrying both values. Every emitted op is invertible.
///
/// # Example
///
/// ```
/// use json_diff::json_patch::apply_ops;
/// use json_diff::json_patch_diff::infer_patch;
/// use json_diff_util::Value;
/// use serde_json::json;
///
/// let pre = Value::from(json!({"title": "a", "tags": ["x"], "gone": 1}));
/// let post = Value::from(json!({"title": "b", "tags": ["x", "y"], "new": true}));
/// let patch = infer_patch(&pre, &post);
/// assert_eq!(apply_ops(&pre, &patch).unwrap(), post);
/// ```
pub fn infer_patch(pre: &Value, post: &Value) -> Vec<PatchOp> {
    let mut ops = Vec::new();
    diff_at_path(&mut ops, &Path::root(), pre, post);
    ops
}

// ── Core recursive differ ─────────────────────────────────────────────────

fn diff_at_path(ops: &mut Vec<PatchOp>, path: &Path, pre: &Value, post: &Value) {
    if pre.same(post) {
        return;
    }
    match (pre, post) {
        (Value::Object(p), Value::Object(q)) => diff_obj(ops, path, p, q),
        (Value::Array(p), Value::Array(q)) => diff_arr(ops, path, p, q),
        _ => ops.push(PatchOp::Replace {
            path: path.clone(),
            value: post.clone(),
            previous: pre.clone(),
        }),
    }
}

fn diff_obj(ops: &mut Vec<PatchOp>, path: &Path, pre: &Object, post: &Object) {
    for (key, pre_val) in pre {
        let child = path.clone().key(key.as_str());
        match post.get(key) {
            Some(post_val) => diff_at_path(ops, &child, pre_val, post_val),
            None => ops.push(PatchOp::Remove {
                path: child,
                value: pre_val.clone(),
            }),
        }
    }
    for (key, post_val) in post {
        if !pre.contains_key(key) {
            ops.push(PatchOp::Add {
                path: path.clone().key(key.as_str()),
                value: post_val.clone(),
            });
        }
    }
}

fn diff_arr(ops: &mut Vec<PatchOp>, path: &Path, pre: &[Value], post: &[Value]) {
    for edit in diff_by_identity(pre, post) {
        match edit {
            ArrayEdit::Delete { index, value } => ops.push(PatchOp::Remove {
                path: path.clone().index(index),
                value,
            }),
            ArrayEdit::Insert { index, value } => ops.push(PatchOp::Add {
                path: path.clone().index(index),
                value,
            }),
            ArrayEdit::Move { from, to, value } => {
                ops.push(PatchOp::Remove {
                    path: path.clone().index(from),
                    value: value.clone(),
                });
                ops.push(PatchOp::Add {
                    path: path.clone().index(to),
                    value,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json_patch::{apply_ops, revert_ops};
    use serde_json::json;

    fn v(j: serde_json::Value) -> Value {
        Value::from(j)
    }

    fn assert_patch(pre: &Value, post: &Value) -> Vec<PatchOp> {
        let ops = infer_patch(pre, post);
        assert_eq!(&apply_ops(pre, &ops).unwrap(), post);
        assert_eq!(&revert_ops(post, &ops).unwrap(), pre);
        ops
    }

    #[test]
    fn same_handle_is_empty() {
        let doc = v(json!({"a": [1, 2]}));
        assert!(infer_patch(&doc, &doc.clone()).is_empty());
    }

    #[test]
    fn scalar_change_is_replace() {
        let ops = assert_patch(&v(json!({"a": 1})), &v(json!({"a": 2})));
        assert_eq!(
            ops,
            vec![PatchOp::Replace {
                path: Path::root().key("a"),
                value: v(json!(2)),
                previous: v(json!(1)),
            }]
        );
    }

    #[test]
    fn root_type_change_is_replace() {
        let ops = assert_patch(&v(json!({"a": 1})), &v(json!([1])));
        assert_eq!(ops.len(), 1);
        assert!(ops[0].path().is_empty());
    }

    #[test]
    fn object_keys_add_and_remove() {
        let ops = assert_patch(&v(json!({"a": 1, "b": 2})), &v(json!({"b": 2, "c": 3})));
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0].op_name(), "remove");
        assert_eq!(ops[1].op_name(), "add");
    }

    #[test]
    fn array_move_expands_to_remove_add() {
        let pre = v(json!(["a", "b", "c"]));
        let post = v(json!(["c", "a", "b"]));
        let ops = assert_patch(&pre, &post);
        assert_eq!(
            ops,
            vec![
                PatchOp::Remove { path: Path::root().index(2), value: v(json!("c")) },
                PatchOp::Add { path: Path::root().index(0), value: v(json!("c")) },
            ]
        );
    }

    #[test]
    fn nested_edit_only_touches_changed_branch() {
        let pre = v(json!({"meta": {"tags": ["draft"]}, "sections": [{"h": 1}]}));
        let mut post = pre.clone();
        post.make_object_mut()
            .unwrap()
            .insert("title".to_string(), v(json!("x")));
        let ops = assert_patch(&pre, &post);
        assert_eq!(
            ops,
            vec![PatchOp::Add { path: Path::root().key("title"), value: v(json!("x")) }]
        );
    }

    #[test]
    fn array_elements_with_new_handles_are_reinserted() {
        let pre = v(json!([{"n": 1}]));
        let post = v(json!([{"n": 2}]));
        let ops = assert_patch(&pre, &post);
        assert_eq!(ops.len(), 2);
    }
}
