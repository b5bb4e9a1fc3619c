use crate::value::Value;

/// Equality predicate injected into the patch guards.
pub type EqualFn = fn(&Value, &Value) -> bool;

/// Performs a deep equality check between two values.
///
/// This function compares values recursively, checking equality for:
/// - Primitives (null, bool, number, string)
/// - Arrays (element-by-element comparison)
/// - Objects (key-by-key comparison, insertion order ignored)
///
/// Shared handles short-circuit without walking their contents.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use json_diff_util::{deep_equal, Value};
///
/// let a = Value::from(json!({"foo": [1, 2, 3]}));
/// let b = Value::from(json!({"foo": [1, 2, 3]}));
/// let c = Value::from(json!({"foo": [1, 2, 4]}));
///
/// assert!(deep_equal(&a, &b));
/// assert!(!deep_equal(&a, &c));
/// ```
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    if a.same(b) {
        return true;
    }
    match (a, b) {
        // Arrays
        (Value::Array(arr_a), Value::Array(arr_b)) => {
            if arr_a.len() != arr_b.len() {
                return false;
            }
            arr_a.iter().zip(arr_b.iter()).all(|(x, y)| deep_equal(x, y))
        }

        // Objects
        (Value::Object(obj_a), Value::Object(obj_b)) => {
            if obj_a.len() != obj_b.len() {
                return false;
            }
            for (key, val_a) in obj_a.iter() {
                match obj_b.get(key) {
                    Some(val_b) => {
                        if !deep_equal(val_a, val_b) {
                            return false;
                        }
                    }
                    None => return false,
                }
            }
            true
        }

        // Scalars that are not `same` differ; different types are never equal
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn v(j: serde_json::Value) -> Value {
        Value::from(j)
    }

    #[test]
    fn test_primitives() {
        assert!(deep_equal(&v(json!(null)), &v(json!(null))));
        assert!(deep_equal(&v(json!(true)), &v(json!(true))));
        assert!(!deep_equal(&v(json!(true)), &v(json!(false))));
        assert!(deep_equal(&v(json!(42)), &v(json!(42))));
        assert!(!deep_equal(&v(json!(42)), &v(json!(43))));
        assert!(deep_equal(&v(json!("hello")), &v(json!("hello"))));
        assert!(!deep_equal(&v(json!("hello")), &v(json!("world"))));
    }

    #[test]
    fn test_arrays() {
        assert!(deep_equal(&v(json!([])), &v(json!([]))));
        assert!(deep_equal(&v(json!([1, 2, 3])), &v(json!([1, 2, 3]))));
        assert!(!deep_equal(&v(json!([1, 2, 3])), &v(json!([1, 2]))));
        assert!(!deep_equal(&v(json!([1, 2, 3])), &v(json!([1, 2, 4]))));
        assert!(!deep_equal(&v(json!([1, 2, 3])), &v(json!([3, 2, 1]))));
    }

    #[test]
    fn test_objects_ignore_key_order() {
        assert!(deep_equal(&v(json!({})), &v(json!({}))));
        assert!(deep_equal(
            &v(json!({"a": 1, "b": 2})),
            &v(json!({"b": 2, "a": 1}))
        ));
        assert!(!deep_equal(&v(json!({"a": 1})), &v(json!({"a": 2}))));
        assert!(!deep_equal(&v(json!({"a": 1})), &v(json!({"b": 1}))));
        assert!(!deep_equal(&v(json!({"a": 1})), &v(json!({"a": 1, "b": 2}))));
    }

    #[test]
    fn test_nested() {
        let a = json!({"foo": [1, {"bar": "baz"}], "qux": {"nested": true}});
        let b = json!({"foo": [1, {"bar": "baz"}], "qux": {"nested": true}});
        let c = json!({"foo": [1, {"bar": "different"}], "qux": {"nested": true}});
        assert!(deep_equal(&v(a.clone()), &v(b)));
        assert!(!deep_equal(&v(a), &v(c)));
    }

    #[test]
    fn test_different_types() {
        assert!(!deep_equal(&v(json!(1)), &v(json!("1"))));
        assert!(!deep_equal(&v(json!([])), &v(json!({}))));
        assert!(!deep_equal(&v(json!(null)), &v(json!(false))));
    }

    #[test]
    fn shared_handles_short_circuit() {
        let a = v(json!({"big": [1, 2, 3, 4, 5]}));
        let b = a.clone();
        assert!(deep_equal(&a, &b));
    }
}
