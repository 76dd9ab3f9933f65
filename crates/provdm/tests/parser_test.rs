use chrono::{DateTime, Utc};
use provdm::{
    parse_document, parse_str, render, Account, Activity, Agent, AttrKey, AttrValue, Attributes,
    ContainerConfig, Entity, Namespace, Node, ProvContainer, ProvError, ProvLiteral, Relation,
};
use serde_json::json;

fn attr<'a>(attributes: &'a Attributes, ns: &Namespace, local: &str) -> &'a AttrValue {
    attributes
        .get(&AttrKey::Name(ns.qname(local)))
        .unwrap_or_else(|| panic!("missing attribute {local}"))
}

fn sample_container() -> ProvContainer {
    let foaf = Namespace::new("foaf", "http://xmlns.com/foaf/0.1/");
    let mut container = ProvContainer::new();
    container
        .set_default_namespace("http://www.example.com/")
        .expect("default namespace");
    container.add_namespace("foaf", foaf.uri()).expect("bind foaf");
    container.add_namespace("dcterms", "http://purl.org/dc/terms/").expect("bind dcterms");

    let start: DateTime<Utc> = "2008-07-06T05:04:03Z".parse().expect("start");
    let ctx = container.context();
    let e0 = Entity::builder("e0")
        .attr("type", "File")
        .attr("path", "/shared/crime.txt")
        .attr("creator", foaf.qname("Alice"))
        .build(&ctx)
        .expect("e0");
    let e1 = Entity::builder(foaf.qname("Foo"))
        .attr("dcterms:creator", vec![foaf.qname("Alice"), foaf.qname("Bill")])
        .attr("dcterms:title", ProvLiteral::lang_string("Crime", "en"))
        .build(&ctx)
        .expect("e1");
    let a0 = Activity::builder("a0")
        .start_time(start)
        .attr("recipeLink", "create-file")
        .build(&ctx)
        .expect("a0");
    let bob = Agent::builder("bob")
        .attr("type", "foaf:Person")
        .build(&ctx)
        .expect("bob");
    let g0 = Relation::was_generated_by(&e0, &a0)
        .expect("generation")
        .id("g0")
        .time(start)
        .attr("fct", "create")
        .build(&ctx)
        .expect("g0");
    let u0 = Relation::used(&a0, &e1)
        .expect("usage")
        .id("u0")
        .build(&ctx)
        .expect("u0");
    let d0 = Relation::was_derived_from(&e0, &e1)
        .expect("derivation")
        .activity(&a0)
        .expect("activity")
        .generation(g0.element_ref().expect("g0 ref"))
        .expect("generation")
        .usage(u0.element_ref().expect("u0 ref"))
        .expect("usage")
        .build(&ctx)
        .expect("d0");
    let assoc = Relation::was_associated_with(&a0, &bob)
        .expect("association")
        .plan(&e1)
        .expect("plan")
        .build(&ctx)
        .expect("assoc");
    let account = Account::builder("acc0", "asserter_name")
        .namespace("ex", "http://www.example2222.com/")
        .attr("accountattr", Namespace::new("ex", "http://www.example2222.com/").qname("accattrvalue"))
        .build(&ctx)
        .expect("acc0");

    container.add(e0).expect("add e0");
    container.add(e1).expect("add e1");
    container.add(a0).expect("add a0");
    container.add(bob).expect("add bob");
    container.add(g0).expect("add g0");
    container.add(u0).expect("add u0");
    container.add(d0).expect("add d0");
    container.add(assoc).expect("add assoc");
    let acc0 = container.add(account).expect("add acc0");
    container.add_entity("ex:e2", Some(&acc0)).expect("e2");
    container.add_entity("en", Some(&acc0)).expect("en");
    let g0_id = container.context().resolve("g0").expect("g0 id");
    container.add_to_account(&acc0, &g0_id).expect("g0 member");
    container
}

#[test]
fn test_round_trip_preserves_model() {
    let original = sample_container();
    let doc = render(&original);
    let parsed = parse_document(&doc).expect("parse rendered document");

    assert_eq!(parsed.len(), original.len());
    assert_eq!(parsed.default_namespace(), original.default_namespace());
    // Parsing regroups nodes by section, so compare by id rather than position.
    for node in original.nodes() {
        assert_eq!(parsed.node(node.id()), Some(node), "node {}", node.id());
    }
    for relation in original.relations() {
        let id = relation.id().expect("added relations carry an id");
        assert_eq!(parsed.relation(id), Some(relation), "relation {}", id);
    }
    for account in original.accounts() {
        assert_eq!(parsed.account(account.id()), Some(account), "account {}", account.id());
    }

    let rerendered = render(&parsed);
    assert_eq!(rerendered, doc);
    let section_order = |value: &serde_json::Value| -> Vec<String> {
        value.as_object().expect("document").keys().cloned().collect()
    };
    assert_eq!(section_order(&rerendered), section_order(&doc));
}

#[test]
fn test_round_trip_through_text() {
    let original = sample_container();
    let text = provdm::Serializer::default()
        .encode(&original)
        .expect("encode");
    let parsed = parse_str(&text).expect("parse text");
    assert_eq!(render(&parsed), render(&original));
}

#[test]
fn test_parse_resolves_references_and_scalars() {
    let doc = json!({
        "prefix": {"ex": "http://example.com/"},
        "entity": {
            "ex:e0": {
                "ex:count": 3,
                "ex:ratio": 0.5,
                "ex:flag": true,
                "ex:link": "http://other.org/thing",
                "ex:see": "ex:e1",
                "ex:note": "plain text"
            }
        }
    });
    let container = parse_document(&doc).expect("parse");
    let ex = Namespace::new("ex", "http://example.com/");
    let node = container.node(&ex.qname("e0")).expect("e0");
    let get = |local: &str| attr(node.attributes(), &ex, local).clone();

    let count = match get("count") {
        AttrValue::Lit(lit) => lit,
        other => panic!("expected literal, got {other:?}"),
    };
    assert_eq!(count.value(), "3");
    assert_eq!(count.datatype().uri(), "http://www.w3.org/2001/XMLSchema#long");
    assert!(matches!(get("ratio"), AttrValue::Lit(lit) if lit.datatype().local_name() == "double"));
    assert!(matches!(get("flag"), AttrValue::Lit(lit) if lit.value() == "true"));
    assert_eq!(
        get("link").as_ref_name().map(|q| q.uri()),
        Some("http://other.org/thing".to_string())
    );
    assert_eq!(get("see").as_ref_name(), Some(&ex.qname("e1")));
    assert_eq!(get("note").as_str(), Some("plain text"));
    assert!(matches!(node, Node::Entity(_)));
}

#[test]
fn test_parse_rejects_malformed_documents() {
    let cases = vec![
        json!([]),
        json!({"entity": []}),
        json!({"entity": {"e0": {}}}),
        json!({"prefix": {"ex": "http://example.com/"}, "entity": {"ex:e0": {"ex:a": null}}}),
        json!({"prefix": {"ex": "http://example.com/"}, "entity": {"ex:e0": {"ex:a": [["nested"]]}}}),
        json!({"prefix": {"ex": "http://example.com/"}, "entity": {"ex:e0": {"startTime": "2008-07-06T05:04:03Z"}}}),
        json!({"prefix": {"ex": "http://example.com/"}, "activity": {"ex:a0": {"startTime": "yesterday"}}}),
        json!({"prefix": {"ex": "http://example.com/"}, "account": {"ex:acc0": {"entity": []}}}),
        json!({"prefix": {"ex": "http://example.com/"}, "entity": {"ex:e0": {"ex:l": {"type": "xsd:string"}}}}),
    ];
    for doc in cases {
        let err = parse_document(&doc).unwrap_err();
        assert!(
            matches!(err, ProvError::MalformedDocument { .. } | ProvError::UnresolvedPrefix { .. }),
            "unexpected error for {doc}: {err}"
        );
    }
}

#[test]
fn test_parse_requires_relation_endpoints() {
    let doc = json!({
        "prefix": {"ex": "http://example.com/"},
        "entity": {"ex:e0": {}},
        "wasGeneratedBy": {"ex:g0": {"entity": "ex:e0"}}
    });
    let err = parse_document(&doc).unwrap_err();
    match err {
        ProvError::MalformedDocument { reason } => assert!(reason.contains("'activity'")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_parse_reports_dangling_and_conflicting_input() {
    let dangling = json!({
        "prefix": {"ex": "http://example.com/"},
        "activity": {"ex:a0": {}},
        "used": {"ex:u0": {"activity": "ex:a0", "entity": "ex:missing"}}
    });
    assert!(matches!(
        parse_document(&dangling).unwrap_err(),
        ProvError::UnknownNode { .. }
    ));

    let backwards = json!({
        "prefix": {"ex": "http://example.com/"},
        "activity": {"ex:a0": {"startTime": "2008-07-06T05:04:03Z", "endTime": "2008-07-06T05:00:00Z"}}
    });
    assert!(matches!(
        parse_document(&backwards).unwrap_err(),
        ProvError::InvalidTimeRange { .. }
    ));

    assert!(matches!(parse_str("{not json"), Err(ProvError::Json(_))));
}

#[test]
fn test_round_trip_keeps_names_from_unterminated_namespaces() {
    let ex = Namespace::new("ex", "http://example.com/");
    let unbound = Namespace::new("t", "http://t.org/ns");
    let mut container = ProvContainer::new();
    container.add_namespace("ex", ex.uri()).expect("bind ex");
    let e0 = Entity::builder(ex.qname("e0"))
        .attr("ex:link", unbound.qname("x"))
        .attr("ex:path", Namespace::new("ex", "http://example.com/").qname("a/b"))
        .build(&container.context())
        .expect("e0");
    container.add(e0.clone()).expect("add e0");

    let doc = render(&container);
    assert_eq!(doc["entity"]["ex:e0"]["ex:link"], json!("http://t.org/nsx"));
    let parsed = parse_document(&doc).expect("parse");
    let node = parsed.node(&ex.qname("e0")).expect("e0");
    assert_eq!(attr(node.attributes(), &ex, "link").as_ref_name(), Some(&unbound.qname("x")));
    assert_eq!(attr(node.attributes(), &ex, "path").as_ref_name(), Some(&ex.qname("a/b")));
    assert_eq!(node, &Node::Entity(e0));
    assert_eq!(render(&parsed), doc);
}

#[test]
fn test_parse_document_with_rebound_well_known_prefix() {
    let xsd = Namespace::new("xsd", "http://www.w3.org/2001/XMLSchema-datatypes#");
    let ex = Namespace::new("ex", "http://example.com/");
    let mut container =
        ProvContainer::with_config(ContainerConfig::default().without_well_known_namespaces());
    container.add_namespace("xsd", xsd.uri()).expect("bind xsd");
    container.add_namespace("ex", ex.uri()).expect("bind ex");
    let e0 = Entity::builder(ex.qname("e0"))
        .attr("ex:at", ProvLiteral::typed("2011-11-16T16:06:00", xsd.qname("dateTime")))
        .build(&container.context())
        .expect("e0");
    container.add(e0.clone()).expect("add e0");

    let doc = render(&container);
    assert_eq!(doc["prefix"]["xsd"], json!(xsd.uri()));
    let parsed = parse_document(&doc).expect("parse rebound xsd");
    assert!(!parsed.config().well_known_namespaces);
    assert_eq!(parsed.node(&ex.qname("e0")), Some(&Node::Entity(e0)));
    assert_eq!(render(&parsed), doc);
}

#[test]
fn test_prefixed_looking_strings_parse_back_as_references() {
    let ex = Namespace::new("ex", "http://example.com/");
    let mut container = ProvContainer::new();
    container.add_namespace("ex", ex.uri()).expect("bind ex");
    let e0 = Entity::builder(ex.qname("e0"))
        .attr("ex:label", "ex:Plan")
        .build(&container.context())
        .expect("e0");
    assert_eq!(attr(e0.attributes(), &ex, "label").as_str(), Some("ex:Plan"));
    container.add(e0).expect("add e0");

    let doc = render(&container);
    let parsed = parse_document(&doc).expect("parse");
    let node = parsed.node(&ex.qname("e0")).expect("e0");
    // Strings are not tagged in the document, so a bound prefix wins.
    assert_eq!(attr(node.attributes(), &ex, "label").as_ref_name(), Some(&ex.qname("Plan")));
    assert_eq!(render(&parsed), doc);
}
