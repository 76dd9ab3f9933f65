//! PROV-JSON rendering.
//!
//! Rendering is a read-only projection of a [`ProvContainer`]: sections appear
//! in a fixed order, elements in pool insertion order, and nothing is
//! reordered, deduplicated or validated on the way out.

use crate::account::Account;
use crate::config::SerializerConfig;
use crate::container::ProvContainer;
use crate::error::Result;
use crate::literal::{format_time, ProvLiteral};
use crate::namespace::{NameUsage, QualifiedName, ResolutionContext};
use crate::relations::{Relation, RelationKind};
use crate::types::{AttrKey, AttrValue, Attributes, ElementKind, Node, NodeKind};
use crate::vocabulary::{keys, literal, namespaces, sections};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::{debug, info_span};

/// A rendered document: nested JSON-compatible objects in insertion order.
pub type Document = Value;

const NODE_KINDS: [NodeKind; 3] = [NodeKind::Entity, NodeKind::Activity, NodeKind::Agent];

#[derive(Debug, Clone, Copy, Default)]
pub struct Serializer {
    config: SerializerConfig,
}

impl Serializer {
    pub fn new(config: SerializerConfig) -> Self {
        Self { config }
    }

    pub fn render(&self, container: &ProvContainer) -> Document {
        let span = info_span!(
            "render_document",
            elements = container.len(),
            accounts = container.accounts().count()
        );
        let _guard = span.enter();

        let ctx = container.context();
        let mut doc = Map::new();

        let prefixes = render_prefixes(container);
        if !prefixes.is_empty() {
            doc.insert(sections::PREFIX.to_string(), Value::Object(prefixes));
        }

        for kind in NODE_KINDS {
            let section: Map<String, Value> = container
                .nodes()
                .filter(|node| node.kind() == kind)
                .map(|node| (ctx.shorten(node.id(), NameUsage::Identifier), render_node(node, &ctx)))
                .collect();
            insert_section(&mut doc, kind.section(), section);
        }

        for kind in RelationKind::ALL {
            let section: Map<String, Value> = container
                .relations()
                .filter(|relation| relation.kind() == kind)
                .filter_map(|relation| {
                    let id = relation.id()?;
                    Some((ctx.shorten(id, NameUsage::Identifier), render_relation(relation, &ctx)))
                })
                .collect();
            insert_section(&mut doc, kind.section(), section);
        }

        let accounts: Map<String, Value> = container
            .accounts()
            .map(|account| {
                let scoped = account.context(container.namespaces(), container.default_namespace());
                (
                    scoped.shorten(account.id(), NameUsage::Identifier),
                    render_account(container, account, &scoped),
                )
            })
            .collect();
        insert_section(&mut doc, sections::ACCOUNT, accounts);

        debug!(sections = doc.len(), "document rendered");
        Value::Object(doc)
    }

    /// Render and encode as UTF-8 JSON text.
    pub fn encode(&self, container: &ProvContainer) -> Result<String> {
        let doc = self.render(container);
        let text = if self.config.pretty {
            serde_json::to_string_pretty(&doc)?
        } else {
            serde_json::to_string(&doc)?
        };
        Ok(text)
    }
}

/// Render with the default configuration.
pub fn render(container: &ProvContainer) -> Document {
    Serializer::default().render(container)
}

fn insert_section(doc: &mut Map<String, Value>, name: &str, section: Map<String, Value>) {
    if !section.is_empty() {
        doc.insert(name.to_string(), Value::Object(section));
    }
}

fn render_prefixes(container: &ProvContainer) -> Map<String, Value> {
    let mut prefixes = Map::new();
    if let Some(default) = container.default_namespace() {
        prefixes.insert(namespaces::DEFAULT_KEY.to_string(), Value::String(default.to_string()));
    }
    let well_known = container.config().well_known_namespaces;
    for (prefix, uri) in container.namespaces().iter() {
        if well_known && is_implied(prefix, uri) {
            continue;
        }
        prefixes.insert(prefix.to_string(), Value::String(uri.to_string()));
    }
    prefixes
}

fn is_implied(prefix: &str, uri: &str) -> bool {
    matches!(
        (prefix, uri),
        (namespaces::PROV_PREFIX, namespaces::PROV)
            | (namespaces::XSD_PREFIX, namespaces::XSD)
            | (namespaces::BLANK_PREFIX, namespaces::BLANK)
    )
}

fn render_node(node: &Node, ctx: &ResolutionContext<'_>) -> Value {
    let mut body = Map::new();
    if let Node::Activity(activity) = node {
        if let Some(start) = activity.start_time() {
            body.insert(keys::START_TIME.to_string(), Value::String(format_time(&start)));
        }
        if let Some(end) = activity.end_time() {
            body.insert(keys::END_TIME.to_string(), Value::String(format_time(&end)));
        }
    }
    render_attributes(&mut body, node.attributes(), ctx);
    Value::Object(body)
}

fn render_relation(relation: &Relation, ctx: &ResolutionContext<'_>) -> Value {
    let mut body = Map::new();
    for (role, target) in relation.endpoints() {
        body.insert(
            role.key().to_string(),
            Value::String(ctx.shorten(target, NameUsage::Identifier)),
        );
    }
    if let Some(time) = relation.time() {
        body.insert(keys::TIME.to_string(), Value::String(format_time(&time)));
    }
    render_attributes(&mut body, relation.attributes(), ctx);
    Value::Object(body)
}

fn render_account(
    container: &ProvContainer,
    account: &Account,
    ctx: &ResolutionContext<'_>,
) -> Value {
    let mut body = Map::new();
    body.insert(
        keys::ASSERTER.to_string(),
        Value::String(ctx.shorten(account.asserter(), NameUsage::Identifier)),
    );
    render_attributes(&mut body, account.attributes(), ctx);

    if !account.namespaces().is_empty() {
        let local: Map<String, Value> = account
            .namespaces()
            .iter()
            .map(|(prefix, uri)| (prefix.to_string(), Value::String(uri.to_string())))
            .collect();
        body.insert(keys::PREFIX.to_string(), Value::Object(local));
    }

    let mut members: IndexMap<&'static str, Vec<Value>> = IndexMap::new();
    for section in member_section_order() {
        members.insert(section, Vec::new());
    }
    for member in account.members() {
        if let Some(kind) = container.kind_of(member) {
            members
                .entry(kind.section())
                .or_default()
                .push(Value::String(ctx.shorten(member, NameUsage::Identifier)));
        }
    }
    for (section, ids) in members {
        if !ids.is_empty() {
            body.insert(section.to_string(), Value::Array(ids));
        }
    }
    Value::Object(body)
}

fn member_section_order() -> impl Iterator<Item = &'static str> {
    NODE_KINDS
        .into_iter()
        .map(|kind| ElementKind::Node(kind).section())
        .chain(RelationKind::ALL.into_iter().map(|kind| kind.section()))
        .chain(std::iter::once(sections::ACCOUNT))
}

fn render_attributes(body: &mut Map<String, Value>, attributes: &Attributes, ctx: &ResolutionContext<'_>) {
    for (key, value) in attributes.iter() {
        body.insert(render_key(key, ctx), render_value(value, ctx));
    }
}

fn render_key(key: &AttrKey, ctx: &ResolutionContext<'_>) -> String {
    match key {
        AttrKey::Type => keys::TYPE.to_string(),
        AttrKey::Name(qname) => ctx.shorten(qname, NameUsage::Key),
    }
}

fn render_value(value: &AttrValue, ctx: &ResolutionContext<'_>) -> Value {
    match value {
        AttrValue::Str(text) => Value::String(text.clone()),
        AttrValue::Ref(qname) => Value::String(render_reference(qname, ctx)),
        AttrValue::Lit(lit) => render_literal(lit, ctx),
        AttrValue::List(values) => {
            Value::Array(values.iter().map(|value| render_value(value, ctx)).collect())
        }
    }
}

fn render_reference(qname: &QualifiedName, ctx: &ResolutionContext<'_>) -> String {
    ctx.shorten(qname, NameUsage::Value)
}

fn render_literal(lit: &ProvLiteral, ctx: &ResolutionContext<'_>) -> Value {
    let mut body = Map::new();
    body.insert(literal::VALUE.to_string(), Value::String(lit.value().to_string()));
    body.insert(
        literal::TYPE.to_string(),
        Value::String(render_reference(lit.datatype(), ctx)),
    );
    if let Some(lang) = lit.language() {
        body.insert(literal::LANG.to_string(), Value::String(lang.to_string()));
    }
    Value::Object(body)
}
