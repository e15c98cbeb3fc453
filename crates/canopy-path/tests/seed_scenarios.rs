//! Lookups against representative response documents.

use canopy_path::{find, lookup, JsonPath, Lookup};
use serde_json::{json, Value};

fn document() -> Value {
    json!({
        "key": "value",
        "nested": {"sub": "super"},
        "kids": [{"name": "dennis"}, {"name": "lisa"}]
    })
}

#[test]
fn root_returns_whole_document() {
    let doc = document();
    assert_eq!(find(&doc, "."), Some(&doc));
}

#[test]
fn top_level_key() {
    assert_eq!(find(&json!({"key": "value"}), ".key"), Some(&json!("value")));
}

#[test]
fn nested_key() {
    assert_eq!(
        find(&json!({"nested": {"sub": "super"}}), ".nested.sub"),
        Some(&json!("super"))
    );
}

#[test]
fn index_into_array_then_key() {
    assert_eq!(find(&document(), ".kids.1.name"), Some(&json!("lisa")));
}

#[test]
fn missing_key() {
    assert_eq!(find(&json!({"key": "value"}), ".missing"), None);
}

#[test]
fn index_out_of_range() {
    assert_eq!(find(&json!({"kids": [1, 2]}), ".kids.5"), None);
}

#[test]
fn non_numeric_index() {
    assert_eq!(find(&json!({"kids": [1, 2]}), ".kids.abc"), None);
}

#[test]
fn same_path_addresses_different_shapes() {
    let path = JsonPath::parse(".items.0").unwrap();

    let as_array = json!({"items": ["first"]});
    let as_object = json!({"items": {"0": "zero"}});

    assert_eq!(path.resolve(&as_array), Some(&json!("first")));
    assert_eq!(path.resolve(&as_object), Some(&json!("zero")));
}

#[test]
fn null_leaf_is_found_not_missing() {
    let doc = json!({"user": {"nickname": null}});
    assert_eq!(lookup(&doc, ".user.nickname"), Lookup::FoundNull);
    assert_eq!(lookup(&doc, ".user.email"), Lookup::NotFound);
    assert_eq!(find(&doc, ".user.nickname"), Some(&Value::Null));
}

#[test]
fn shared_document_across_threads() {
    let doc = std::sync::Arc::new(document());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let doc = std::sync::Arc::clone(&doc);
            std::thread::spawn(move || {
                let path = format!(".kids.{}.name", i % 2);
                find(&doc, &path).cloned()
            })
        })
        .collect();

    let names: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(names[0], Some(json!("dennis")));
    assert_eq!(names[1], Some(json!("lisa")));
}
