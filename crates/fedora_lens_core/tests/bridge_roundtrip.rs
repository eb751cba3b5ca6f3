use fedora_lens_core::vocab::{DC_RELATION, DC_SUBJECT, DC_TITLE};
use fedora_lens_core::{
    AttributeBridge, AttributeMap, IdentityMapper, ModelDeclaration, Resource, Segment,
    StoreConfig, Term, Value,
};
use proptest::prelude::*;

fn book_bridge() -> AttributeBridge {
    let declaration = ModelDeclaration::new("Book")
        .attribute(
            "title",
            vec![
                Segment::predicate(DC_TITLE),
                Segment::Single,
                Segment::LiteralToString,
            ],
        )
        .attribute(
            "subjects",
            vec![Segment::predicate(DC_SUBJECT), Segment::LiteralsToStrings],
        )
        .attribute(
            "related",
            vec![
                Segment::predicate(DC_RELATION),
                Segment::Single,
                Segment::UriToString,
            ],
        );
    AttributeBridge::build(&declaration).expect("book declaration is well-typed")
}

/// Partial maps of present values: `Null` and empty lists read back as
/// absent, so they are covered separately.
fn attribute_map_strategy() -> impl Strategy<Value = AttributeMap> {
    (
        proptest::option::of("[a-z ]{0,12}".prop_map(Value::Scalar)),
        proptest::option::of(proptest::collection::vec("[a-z]{1,8}", 1..4).prop_map(Value::list)),
        proptest::option::of(
            "[a-z]{1,8}".prop_map(|id| Value::Scalar(format!("http://h/{id}"))),
        ),
    )
        .prop_map(|(title, subjects, related)| {
            let mut map = AttributeMap::new();
            if let Some(title) = title {
                map.insert("title", title);
            }
            if let Some(subjects) = subjects {
                map.insert("subjects", subjects);
            }
            if let Some(related) = related {
                map.insert("related", related);
            }
            map
        })
}

proptest! {
    #[test]
    fn put_then_get_returns_written_attributes(map in attribute_map_strategy()) {
        let bridge = book_bridge();
        let resource = bridge.put(&Resource::new_in("http://h/rest"), &map);
        prop_assert_eq!(bridge.get(&resource), map);
    }

    #[test]
    fn get_then_put_leaves_resource_unchanged(map in attribute_map_strategy()) {
        let bridge = book_bridge();
        let resource = bridge.put(&Resource::new_in("http://h/rest"), &map);
        let again = bridge.put(&resource, &bridge.get(&resource));
        prop_assert_eq!(again, resource);
    }

    #[test]
    fn id_round_trips_through_uri(id in "[a-z0-9]{1,8}(/[a-z0-9]{1,8}){0,2}") {
        let ids = IdentityMapper::new(&StoreConfig::new("http://h/rest", "/test-base").unwrap());
        let uri = ids.id_to_uri(&id);
        prop_assert!(ids.is_scoped_uri(&uri));
        prop_assert_eq!(ids.uri_to_id(&uri), id.clone());
        prop_assert_eq!(ids.uri_to_id(&ids.id_to_uri(&format!("/{id}"))), id);
    }

    #[test]
    fn base_path_appears_once(
        id in "[a-z0-9]{1,8}(/[a-z0-9]{1,8}){0,2}",
        prefixed in any::<bool>(),
    ) {
        let ids = IdentityMapper::new(&StoreConfig::new("http://h/rest", "/test-base").unwrap());
        let id = if prefixed { format!("test-base/{id}") } else { id };
        let uri = ids.id_to_uri(&id);

        prop_assert_eq!(uri.matches("/test-base").count(), 1);
        prop_assert_eq!(ids.id_to_uri(&uri), uri);
    }
}

#[test]
fn cleared_values_read_back_as_absent() {
    let bridge = book_bridge();
    let full: AttributeMap = [
        ("title", Value::scalar("Dune")),
        ("subjects", Value::list(["scifi"])),
    ]
    .into_iter()
    .collect();
    let resource = bridge.put(&Resource::new_in("http://h/rest"), &full);

    let cleared: AttributeMap = [("title", Value::Null), ("subjects", Value::List(Vec::new()))]
        .into_iter()
        .collect();
    let resource = bridge.put(&resource, &cleared);
    assert!(resource.graph().is_empty());
    assert!(bridge.get(&resource).is_empty());
}

#[test]
fn put_keeps_statements_outside_declared_paths() {
    let bridge = book_bridge();
    let mut graph = fedora_lens_core::Graph::new();
    graph.push("urn:x:note", Term::literal("kept"));
    graph.push(DC_TITLE, Term::literal("old"));
    let resource = Resource::new_in("http://h/rest").with_graph(graph);

    let attributes: AttributeMap = [("title", "new")].into_iter().collect();
    let updated = bridge.put(&resource, &attributes);

    assert_eq!(updated.graph().objects("urn:x:note"), &[Term::literal("kept")]);
    assert_eq!(updated.graph().objects(DC_TITLE), &[Term::literal("new")]);
}

#[test]
fn multi_valued_put_keeps_uri_objects() {
    let bridge = book_bridge();
    let mut graph = fedora_lens_core::Graph::new();
    graph.push(DC_SUBJECT, Term::uri("http://h/topic"));
    graph.push(DC_SUBJECT, Term::literal("old"));
    let resource = Resource::new_in("http://h/rest").with_graph(graph);

    let attributes: AttributeMap = [("subjects", Value::list(["a", "b"]))]
        .into_iter()
        .collect();
    let updated = bridge.put(&resource, &attributes);

    assert_eq!(
        updated.graph().objects(DC_SUBJECT),
        &[
            Term::uri("http://h/topic"),
            Term::literal("a"),
            Term::literal("b"),
        ]
    );
    assert_eq!(
        bridge.get(&updated).get("subjects"),
        Some(&Value::list(["a", "b"]))
    );
}
