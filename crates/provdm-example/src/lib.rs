//! The usage example: a small crime-file graph with entities, an activity,
//! typed relations and an account carrying its own namespace scope.

use anyhow::Context;
use chrono::{TimeZone, Utc};
use provdm::{
    Account, Activity, ContainerConfig, Entity, Namespace, ProvContainer, ProvLiteral, Relation,
    SerializerConfig,
};
use provdm_observability::spans;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Settings read from `--config`; every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub container: ContainerConfig,
    pub serializer: SerializerConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self { container: ContainerConfig::default(), serializer: SerializerConfig::pretty() }
    }
}

impl RunConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let span = spans::load_config(path);
        let _guard = span.enter();

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: RunConfig = serde_json::from_str(&text)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        debug!(?config, "configuration loaded");
        Ok(config)
    }
}

pub fn build_example_graph(config: ContainerConfig) -> anyhow::Result<ProvContainer> {
    let foaf = Namespace::new("foaf", "http://xmlns.com/foaf/0.1/");
    let ex = Namespace::new("ex", "http://www.example.com/");
    let dcterms = Namespace::new("dcterms", "http://purl.org/dc/terms/");
    // Not registered with the graph, so these render as full URIs.
    let xsd = Namespace::new("xsd", "http://www.w3.org/2001/XMLSchema-datatypes#");
    let testns = Namespace::new("test", "http://www.test.org/");
    let exns = Namespace::new("test", "http://www.example.org/");

    let mut graph = ProvContainer::with_config(config);
    graph.set_default_namespace(ex.uri())?;
    graph.add_namespace(dcterms.prefix(), dcterms.uri())?;
    graph.add_namespace(foaf.prefix(), foaf.uri())?;

    let start = Utc
        .with_ymd_and_hms(2008, 7, 6, 5, 4, 3)
        .single()
        .context("invalid activity start time")?;

    let ctx = graph.context();
    let e0 = Entity::builder(ex.qname("e0"))
        .attr("type", "File")
        .attr(ex.qname("path"), "/shared/crime.txt")
        .attr(ex.qname("creator"), foaf.qname("Alice"))
        .build(&ctx)?;
    let e1 = Entity::builder(foaf.qname("Foo"))
        .attr("type", "File")
        .attr(ex.qname("path"), "/shared/crime.txt")
        .attr(
            dcterms.qname("creator"),
            vec![foaf.qname("Alice"), foaf.qname("Bill"), exns.qname("Foo")],
        )
        .attr(ex.qname("content"), "")
        .attr(
            dcterms.qname("create"),
            ProvLiteral::typed("2011-11-16T16:06:00", xsd.qname("dateTime")),
        )
        .attr(exns.qname("testns"), testns.qname("localname"))
        .build(&ctx)?;
    let a0 = Activity::builder("a0")
        .start_time(start)
        .attr("recipeLink", "create-file")
        .build(&ctx)?;

    let g0 = Relation::was_generated_by(&e0, &a0)?
        .id("g0")
        .attr(ex.qname("fct"), "create")
        .build(&ctx)?;
    let u0 = Relation::used(&a0, &e1)?
        .id("u0")
        .attr(ex.qname("fct"), "load")
        .attr(ex.qname("typeexample"), ProvLiteral::typed("MyValue", ex.qname("MyType")))
        .build(&ctx)?;
    let g0_ref = g0.element_ref().context("generation g0 has no id")?;
    let u0_ref = u0.element_ref().context("usage u0 has no id")?;
    let d0 = Relation::was_derived_from(&e0, &e1)?
        .activity(&a0)?
        .generation(g0_ref)?
        .usage(u0_ref)?
        .build(&ctx)?;

    let acc0 = Account::builder("acc0", ex.qname("asserter_name"))
        .namespace("ex", "http://www.example2222.com/")
        .attr(ex.qname("accountattr"), ex.qname("accattrvalue"))
        .build(&ctx)?;

    graph.add(e0)?;
    graph.add(e1)?;
    graph.add(a0)?;
    graph.add(g0)?;
    graph.add(u0)?;
    graph.add(d0)?;
    let acc0 = graph.add(acc0)?;

    graph.add_entity(ex.qname("e2"), Some(&acc0))?;
    graph.add_entity("en", Some(&acc0))?;

    debug!(elements = graph.len(), "example graph built");
    Ok(graph)
}
