#![allow(dead_code)]

use json_diff::history::{History, SequentialIds};
use json_diff_util::Value;
use proptest::prelude::*;
use serde_json::json;

pub fn v(j: serde_json::Value) -> Value {
    Value::from(j)
}

/// Document used by the history workflow scenarios.
pub fn draft() -> Value {
    v(json!({
        "title": "First Draft",
        "meta": {"tags": ["draft"], "author": "ana"},
        "sections": [
            {"type": "text", "body": "intro"},
            {"type": "image", "src": "a.png"}
        ]
    }))
}

pub fn fresh() -> (History, SequentialIds) {
    (History::new(draft()), SequentialIds::new())
}

pub fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        (-50i64..50).prop_map(Value::from),
        "[a-c]{0,2}".prop_map(Value::from),
    ]
}

/// Arbitrary JSON value with small integer numbers and short object keys.
pub fn arb_value() -> impl Strategy<Value = Value> {
    arb_scalar().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::from),
            prop::collection::vec(("[a-d]{1,2}", inner), 0..4)
                .prop_map(|entries| Value::object(entries)),
        ]
    })
}
