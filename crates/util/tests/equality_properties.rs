use json_diff_util::{deep_equal, Value};
use proptest::prelude::*;

fn arb_json() -> impl Strategy<Value = serde_json::Value> {
    let leaf = prop_oneof![
        Just(serde_json::Value::Null),
        any::<bool>().prop_map(serde_json::Value::from),
        (-20i64..20).prop_map(serde_json::Value::from),
        "[xyz]{0,2}".prop_map(serde_json::Value::from),
    ];
    leaf.prop_recursive(3, 20, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(serde_json::Value::Array),
            prop::collection::btree_map("[ab]{1,2}", inner, 0..4)
                .prop_map(|m| serde_json::Value::Object(m.into_iter().collect())),
        ]
    })
}

proptest! {
    #[test]
    fn deep_equal_matches_json_equality(a in arb_json(), b in arb_json()) {
        let (va, vb) = (Value::from(a.clone()), Value::from(b.clone()));
        prop_assert_eq!(deep_equal(&va, &vb), a == b);
        prop_assert_eq!(deep_equal(&va, &vb), deep_equal(&vb, &va));
    }

    #[test]
    fn fresh_copies_are_equal_but_not_same(a in arb_json()) {
        let first = Value::from(a.clone());
        let second = Value::from(a);
        prop_assert!(deep_equal(&first, &second));
        if first.is_array() || first.is_object() {
            prop_assert!(!first.same(&second));
        }
        prop_assert!(first.same(&first.clone()));
    }

    #[test]
    fn json_round_trip(a in arb_json()) {
        prop_assert_eq!(Value::from(a.clone()).to_json(), a);
    }
}
