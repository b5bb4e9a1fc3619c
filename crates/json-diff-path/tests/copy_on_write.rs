use json_diff_path::{delete_at_end, get, insert_at_end, set_at_end, AddressError, Path};
use json_diff_util::Value;
use serde_json::json;

fn doc() -> Value {
    Value::from(json!({
        "a": {"b": {"c": [1, 2, 3]}, "side": {"x": 1}},
        "z": [{"deep": true}]
    }))
}

#[test]
fn test_deep_write_copies_only_the_spine() {
    let before = doc();
    let path = Path::root().key("a").key("b").key("c").index(1);
    let (after, old) = set_at_end(&before, &path, Value::from(20)).unwrap();

    assert_eq!(old, Some(Value::from(2)));
    assert_eq!(get(&before, &path).unwrap(), Some(&Value::from(2)));
    assert_eq!(get(&after, &path).unwrap(), Some(&Value::from(20)));

    // every container on the way down is fresh
    for depth in 0..4 {
        let spine = path.prefix(depth);
        let old_node = get(&before, &spine).unwrap().unwrap();
        let new_node = get(&after, &spine).unwrap().unwrap();
        assert!(!old_node.same(new_node), "spine at depth {depth} was shared");
    }
    // and everything off the spine is shared
    let side = Path::root().key("a").key("side");
    assert!(get(&before, &side).unwrap().unwrap().same(get(&after, &side).unwrap().unwrap()));
    let z = Path::root().key("z");
    assert!(get(&before, &z).unwrap().unwrap().same(get(&after, &z).unwrap().unwrap()));
}

#[test]
fn test_insert_then_delete_restores_content() {
    let before = doc();
    let path = Path::root().key("z").index(0);
    let inserted = insert_at_end(&before, &path, Value::from("first")).unwrap();
    assert_eq!(inserted.get("z").unwrap().as_array().unwrap().len(), 2);

    let (restored, removed) = delete_at_end(&inserted, &path).unwrap();
    assert_eq!(removed, Value::from("first"));
    assert_eq!(restored, before);
    // the untouched element keeps its identity through both edits
    let elem = Path::root().key("z").index(0);
    assert!(get(&before, &elem).unwrap().unwrap().same(get(&restored, &elem).unwrap().unwrap()));
}

#[test]
fn test_failed_write_leaves_input_untouched() {
    let before = doc();
    let snapshot = before.clone();
    let err = insert_at_end(&before, &Path::root().key("a").key("side"), Value::Null).unwrap_err();
    assert!(matches!(err, AddressError::KeyExists { .. }));
    assert!(before.same(&snapshot));
}

#[test]
fn test_pointer_paths_index_arrays() {
    let before = doc();
    let path = Path::from_pointer("/a/b/c/-");
    let after = insert_at_end(&before, &path, Value::from(4)).unwrap();
    assert_eq!(
        get(&after, &Path::from_pointer("/a/b/c")).unwrap().unwrap().to_json(),
        json!([1, 2, 3, 4])
    );
}

#[test]
fn test_refinements_guard_writes() {
    let before = Value::from(json!({"shapes": [{"type": "circle", "r": 1}]}));
    let radius = Path::root()
        .key("shapes")
        .index(0)
        .tag("type", "circle")
        .key("r");
    let (after, _) = set_at_end(&before, &radius, Value::from(5)).unwrap();
    assert_eq!(get(&after, &radius).unwrap(), Some(&Value::from(5)));

    let side = Path::root()
        .key("shapes")
        .index(0)
        .tag("type", "square")
        .key("side");
    let err = set_at_end(&before, &side, Value::from(5)).unwrap_err();
    assert!(matches!(err, AddressError::WrongTag { .. }));
}
