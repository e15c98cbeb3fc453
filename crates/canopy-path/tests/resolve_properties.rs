//! Property tests for path resolution.

use canopy_path::{resolve, JsonPath};
use proptest::prelude::*;
use serde_json::{Map, Value};

/// Arbitrary documents with a small key alphabet so generated paths hit often.
fn arb_document() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        "[a-z]{0,6}".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 48, 5, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..5).prop_map(Value::Array),
            prop::collection::btree_map("[a-c]", inner, 0..4)
                .prop_map(|entries| Value::Object(entries.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

fn arb_segments() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-c]|[0-3]", 0..4)
}

proptest! {
    #[test]
    fn empty_path_returns_document(doc in arb_document()) {
        prop_assert_eq!(resolve::<String>(&[], &doc), Some(&doc));
    }

    #[test]
    fn single_key_matches_object_get(
        entries in prop::collection::btree_map("[a-z]{1,4}", arb_document(), 1..6),
        pick in any::<prop::sample::Index>(),
    ) {
        let keys: Vec<String> = entries.keys().cloned().collect();
        let key = pick.get(&keys).clone();
        let object = Value::Object(entries.into_iter().collect());

        prop_assert_eq!(resolve(&[key.as_str()], &object), object.get(&key));
    }

    #[test]
    fn valid_index_matches_array_element(
        items in prop::collection::vec(arb_document(), 1..8),
        pick in any::<prop::sample::Index>(),
    ) {
        let index = pick.index(items.len());
        let array = Value::Array(items.clone());

        prop_assert_eq!(resolve(&[index.to_string()], &array), Some(&items[index]));
    }

    #[test]
    fn out_of_range_index_is_not_found(
        items in prop::collection::vec(arb_document(), 0..8),
        overshoot in 0usize..100,
    ) {
        let index = items.len() + overshoot;
        let array = Value::Array(items);

        prop_assert_eq!(resolve(&[index.to_string()], &array), None);
    }

    #[test]
    fn non_numeric_index_is_not_found(
        items in prop::collection::vec(arb_document(), 0..8),
        segment in "[a-z]{1,6}",
    ) {
        let array = Value::Array(items);
        prop_assert_eq!(resolve(&[segment], &array), None);
    }

    #[test]
    fn resolution_composes(
        doc in arb_document(),
        head in arb_segments(),
        tail in arb_segments(),
    ) {
        let full: Vec<String> = head.iter().chain(tail.iter()).cloned().collect();
        let direct = resolve(&full, &doc);

        match resolve(&head, &doc) {
            Some(intermediate) => prop_assert_eq!(direct, resolve(&tail, intermediate)),
            None => prop_assert_eq!(direct, None),
        }
    }

    #[test]
    fn joined_paths_resolve_like_concatenated_segments(
        doc in arb_document(),
        head in arb_segments(),
        tail in arb_segments(),
    ) {
        let joined = JsonPath::from_segments(head.clone()).join(&JsonPath::from_segments(tail.clone()));
        let full: Vec<String> = head.into_iter().chain(tail).collect();

        prop_assert_eq!(joined.resolve(&doc), resolve(&full, &doc));
    }

    #[test]
    fn displayed_path_parses_back(segments in prop::collection::vec("[a-z0-9]{1,5}", 0..5)) {
        let path = JsonPath::from_segments(segments);
        let reparsed = JsonPath::parse(&path.to_string()).unwrap();
        prop_assert_eq!(reparsed, path);
    }
}
