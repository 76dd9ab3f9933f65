use provdm::{parse_document, render, ContainerConfig, Serializer};
use provdm_example::{build_example_graph, RunConfig};
use serde_json::json;

#[test]
fn test_example_graph_renders_expected_document() {
    let graph = build_example_graph(ContainerConfig::default()).expect("build example");
    let doc = render(&graph);

    let expected = json!({
        "prefix": {
            "default": "http://www.example.com/",
            "dcterms": "http://purl.org/dc/terms/",
            "foaf": "http://xmlns.com/foaf/0.1/"
        },
        "entity": {
            "e0": {
                "type": "File",
                "path": "/shared/crime.txt",
                "creator": "foaf:Alice"
            },
            "foaf:Foo": {
                "type": "File",
                "path": "/shared/crime.txt",
                "dcterms:creator": ["foaf:Alice", "foaf:Bill", "http://www.example.org/Foo"],
                "content": "",
                "dcterms:create": {
                    "value": "2011-11-16T16:06:00",
                    "type": "http://www.w3.org/2001/XMLSchema-datatypes#dateTime"
                },
                "http://www.example.org/testns": "http://www.test.org/localname"
            },
            "e2": {},
            "en": {}
        },
        "activity": {
            "a0": {
                "startTime": "2008-07-06T05:04:03Z",
                "recipeLink": "create-file"
            }
        },
        "wasGeneratedBy": {
            "g0": {"entity": "e0", "activity": "a0", "fct": "create"}
        },
        "used": {
            "u0": {
                "activity": "a0",
                "entity": "foaf:Foo",
                "fct": "load",
                "typeexample": {"value": "MyValue", "type": "http://www.example.com/MyType"}
            }
        },
        "wasDerivedFrom": {
            "_:d1": {
                "generatedEntity": "e0",
                "usedEntity": "foaf:Foo",
                "activity": "a0",
                "generation": "g0",
                "usage": "u0"
            }
        },
        "account": {
            "acc0": {
                "asserter": "asserter_name",
                "accountattr": "http://www.example.com/accattrvalue",
                "prefix": {"ex": "http://www.example2222.com/"},
                "entity": ["e2", "en"]
            }
        }
    });
    assert_eq!(doc, expected);

    let sections: Vec<&str> = doc
        .as_object()
        .expect("document")
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(
        sections,
        vec!["prefix", "entity", "activity", "wasGeneratedBy", "used", "wasDerivedFrom", "account"]
    );
}

#[test]
fn test_example_graph_round_trips() {
    let graph = build_example_graph(ContainerConfig::default()).expect("build example");
    let doc = render(&graph);
    let parsed = parse_document(&doc).expect("parse example document");
    assert_eq!(parsed.len(), graph.len());
    assert_eq!(render(&parsed), doc);
}

#[test]
fn test_example_graph_shares_account_members() {
    let graph = build_example_graph(ContainerConfig::default()).expect("build example");
    let acc0 = graph
        .context()
        .resolve("acc0")
        .expect("account id");
    let account = graph.account(&acc0).expect("account present");
    assert_eq!(account.member_count(), 2);
    for member in account.members() {
        assert!(graph.node(member).is_some(), "member {} lives in the pool", member);
    }
}

#[test]
fn test_run_config_defaults_and_overrides() {
    let defaults = RunConfig::default();
    assert!(defaults.serializer.pretty);
    assert!(defaults.container.well_known_namespaces);

    let config: RunConfig = serde_json::from_str(
        r#"{"container": {"blank_namespace": "urn:example:anon:"}, "serializer": {"pretty": false}}"#,
    )
    .expect("parse config");
    assert_eq!(config.container.blank_namespace, "urn:example:anon:");
    assert!(config.container.well_known_namespaces);
    assert!(!config.serializer.pretty);

    let graph = build_example_graph(config.container).expect("build example");
    let text = Serializer::new(config.serializer).encode(&graph).expect("encode");
    assert!(!text.contains('\n'));
    assert!(text.contains(r#""_":"urn:example:anon:""#));
    assert!(text.contains(r#""_:d1":"#));
}
