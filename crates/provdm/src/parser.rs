//! Rebuild a [`ProvContainer`] from a rendered PROV-JSON document.
//!
//! Attribute strings that resolve as `prefix:local` or absolute URIs come
//! back as references; everything else stays a plain string.

use crate::account::Account;
use crate::config::ContainerConfig;
use crate::container::ProvContainer;
use crate::error::{ProvError, Result};
use crate::literal::{xsd_name, ProvLiteral};
use crate::namespace::{NameRef, NamespaceRegistry, QualifiedName, ResolutionContext};
use crate::relations::{Relation, RelationKind};
use crate::types::{Activity, Agent, AttrKey, AttrValue, Attributes, Entity, Node, NodeKind};
use crate::vocabulary::{self, keys, literal, namespaces, sections, xsd};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::{debug, info_span};

type Object = Map<String, Value>;

pub fn parse_str(text: &str) -> Result<ProvContainer> {
    let document: Value = serde_json::from_str(text)?;
    parse_document(&document)
}

pub fn parse_document(document: &Value) -> Result<ProvContainer> {
    let span = info_span!("parse_document");
    let _guard = span.enter();

    let root = as_object(document, "document")?;
    let prefixes = match root.get(sections::PREFIX) {
        Some(value) => Some(as_object(value, sections::PREFIX)?),
        None => None,
    };

    let mut container = ProvContainer::with_config(config_for(prefixes)?);
    if let Some(prefixes) = prefixes {
        for (prefix, uri) in prefixes {
            let uri = as_str(uri, prefix)?;
            if prefix == namespaces::DEFAULT_KEY {
                container.set_default_namespace(uri)?;
            } else {
                container.add_namespace(prefix, uri)?;
            }
        }
    }

    for kind in [NodeKind::Entity, NodeKind::Activity, NodeKind::Agent] {
        for (id, body) in section(root, kind.section())? {
            let node = parse_node(kind, id, body, &container.context())?;
            container.add(node)?;
        }
    }

    for kind in RelationKind::ALL {
        for (id, body) in section(root, kind.section())? {
            let relation = parse_relation(kind, id, body, &container.context())?;
            container.add(relation)?;
        }
    }

    let mut memberships = Vec::new();
    for (id, body) in section(root, sections::ACCOUNT)? {
        let body = as_object(body, id)?;
        let local = parse_local_prefixes(body)?;
        let ctx = container.context().with_local(&local);
        let (account, members) = parse_account(id, body, local.clone(), &ctx)?;
        let account_id = container.add(account)?;
        memberships.push((account_id, members));
    }
    // Accounts may list other accounts, so membership waits for every header.
    for (account_id, members) in memberships {
        for member in members {
            container.add_to_account(&account_id, &member)?;
        }
    }

    debug!(elements = container.len(), "document parsed");
    Ok(container)
}

/// Documents that rebind `prov` or `xsd` came from a container without the
/// well-known namespaces, so the parsed container skips them too.
fn config_for(prefixes: Option<&Object>) -> Result<ContainerConfig> {
    let Some(prefixes) = prefixes else {
        return Ok(ContainerConfig::default());
    };
    let mut config = match prefixes.get(namespaces::BLANK_PREFIX) {
        Some(blank) => ContainerConfig::new(as_str(blank, namespaces::BLANK_PREFIX)?),
        None => ContainerConfig::default(),
    };
    for (prefix, implied) in [
        (namespaces::PROV_PREFIX, namespaces::PROV),
        (namespaces::XSD_PREFIX, namespaces::XSD),
    ] {
        if let Some(uri) = prefixes.get(prefix) {
            if as_str(uri, prefix)? != implied {
                config = config.without_well_known_namespaces();
            }
        }
    }
    Ok(config)
}

fn section<'a>(root: &'a Object, name: &str) -> Result<impl Iterator<Item = (&'a String, &'a Value)>> {
    let entries = match root.get(name) {
        Some(value) => Some(as_object(value, name)?),
        None => None,
    };
    Ok(entries.into_iter().flat_map(|entries| entries.iter()))
}

fn parse_node(kind: NodeKind, id: &str, body: &Value, ctx: &ResolutionContext<'_>) -> Result<Node> {
    let body = as_object(body, id)?;
    let id = ctx.resolve_str(id)?;
    let node = match kind {
        NodeKind::Entity => Node::Entity(Entity::new(id, parse_attributes(body, ctx, &[])?)),
        NodeKind::Agent => Node::Agent(Agent::new(id, parse_attributes(body, ctx, &[])?)),
        NodeKind::Activity => {
            let start = optional_time(body, keys::START_TIME)?;
            let end = optional_time(body, keys::END_TIME)?;
            if let (Some(start), Some(end)) = (start, end) {
                if end < start {
                    return Err(ProvError::InvalidTimeRange { id: id.to_string() });
                }
            }
            let attributes = parse_attributes(body, ctx, &[keys::START_TIME, keys::END_TIME])?;
            Node::Activity(Activity::new(id, start, end, attributes))
        }
    };
    Ok(node)
}

fn parse_relation(
    kind: RelationKind,
    id: &str,
    body: &Value,
    ctx: &ResolutionContext<'_>,
) -> Result<Relation> {
    let body = as_object(body, id)?;
    let id = ctx.resolve_str(id)?;
    let mut endpoints = Vec::new();
    let mut reserved = vec![keys::TIME];
    for role in kind.roles() {
        reserved.push(role.key());
        match body.get(role.key()) {
            Some(target) => endpoints.push((role, ctx.resolve_str(as_str(target, role.key())?)?)),
            None if kind.required_roles().contains(&role) => {
                return Err(ProvError::malformed(format!(
                    "{} {} is missing its '{}' endpoint",
                    kind.section(),
                    id,
                    role.key()
                )));
            }
            None => {}
        }
    }
    let time = optional_time(body, keys::TIME)?;
    let attributes = parse_attributes(body, ctx, &reserved)?;
    Ok(Relation::new(kind, Some(id), endpoints, time, attributes))
}

fn parse_local_prefixes(body: &Object) -> Result<NamespaceRegistry> {
    let mut local = NamespaceRegistry::new();
    if let Some(prefixes) = body.get(keys::PREFIX) {
        for (prefix, uri) in as_object(prefixes, keys::PREFIX)? {
            local.bind(prefix, as_str(uri, prefix)?)?;
        }
    }
    Ok(local)
}

fn parse_account(
    id: &str,
    body: &Object,
    local: NamespaceRegistry,
    ctx: &ResolutionContext<'_>,
) -> Result<(Account, Vec<QualifiedName>)> {
    let account_id = ctx.resolve_str(id)?;
    let asserter = body
        .get(keys::ASSERTER)
        .ok_or_else(|| ProvError::malformed(format!("account {} has no asserter", id)))?;
    let asserter = ctx.resolve_str(as_str(asserter, keys::ASSERTER)?)?;

    let mut members = Vec::new();
    let mut reserved = vec![keys::ASSERTER, keys::PREFIX];
    for (key, value) in body {
        if is_member_section(key) {
            reserved.push(key.as_str());
            let Value::Array(ids) = value else {
                return Err(ProvError::malformed(format!("account member list '{}' is not an array", key)));
            };
            for member in ids {
                members.push(ctx.resolve_str(as_str(member, key)?)?);
            }
        }
    }
    let attributes = parse_attributes(body, ctx, &reserved)?;
    Ok((Account::new(account_id, asserter, local, attributes), members))
}

fn is_member_section(key: &str) -> bool {
    matches!(key, sections::ENTITY | sections::ACTIVITY | sections::AGENT | sections::ACCOUNT)
        || RelationKind::from_section(key).is_some()
}

fn parse_attributes(body: &Object, ctx: &ResolutionContext<'_>, skip: &[&str]) -> Result<Attributes> {
    let mut attributes = Attributes::new();
    for (key, value) in body {
        if skip.contains(&key.as_str()) {
            continue;
        }
        if key != keys::TYPE && vocabulary::is_reserved_key(key) {
            return Err(ProvError::malformed(format!("unexpected reserved key '{}'", key)));
        }
        let key = AttrKey::resolve(ctx, NameRef::from(key))?;
        attributes.insert(key, parse_value(value, ctx, true)?);
    }
    Ok(attributes)
}

fn parse_value(value: &Value, ctx: &ResolutionContext<'_>, allow_list: bool) -> Result<AttrValue> {
    let parsed = match value {
        Value::String(text) => match ctx.resolve_reference(text) {
            Some(qname) => AttrValue::Ref(qname),
            None => AttrValue::Str(text.clone()),
        },
        Value::Object(body) => AttrValue::Lit(parse_literal(body, ctx)?),
        Value::Array(values) if allow_list => AttrValue::List(
            values
                .iter()
                .map(|value| parse_value(value, ctx, false))
                .collect::<Result<Vec<_>>>()?,
        ),
        Value::Array(_) => return Err(ProvError::malformed("nested attribute lists")),
        Value::Bool(flag) => AttrValue::Lit(ProvLiteral::typed(flag.to_string(), xsd_name(xsd::BOOLEAN))),
        Value::Number(number) if number.is_f64() => {
            AttrValue::Lit(ProvLiteral::typed(number.to_string(), xsd_name(xsd::DOUBLE)))
        }
        Value::Number(number) => {
            AttrValue::Lit(ProvLiteral::typed(number.to_string(), xsd_name(xsd::LONG)))
        }
        Value::Null => return Err(ProvError::malformed("null attribute value")),
    };
    Ok(parsed)
}

fn parse_literal(body: &Object, ctx: &ResolutionContext<'_>) -> Result<ProvLiteral> {
    let value = body
        .get(literal::VALUE)
        .ok_or_else(|| ProvError::malformed("literal without a value"))?;
    let datatype = body
        .get(literal::TYPE)
        .ok_or_else(|| ProvError::malformed("literal without a type"))?;
    let datatype = as_str(datatype, literal::TYPE)?;
    let datatype = ctx
        .resolve_reference(datatype)
        .ok_or_else(|| ProvError::UnresolvedPrefix {
            prefix: datatype.split_once(':').map(|(p, _)| p).unwrap_or_default().to_string(),
            name: datatype.to_string(),
        })?;
    let language = match body.get(literal::LANG) {
        Some(lang) => Some(as_str(lang, literal::LANG)?),
        None => None,
    };
    Ok(ProvLiteral::new(as_str(value, literal::VALUE)?, datatype, language))
}

fn optional_time(body: &Object, key: &str) -> Result<Option<DateTime<Utc>>> {
    let Some(value) = body.get(key) else {
        return Ok(None);
    };
    let text = as_str(value, key)?;
    DateTime::parse_from_rfc3339(text)
        .map(|time| Some(time.with_timezone(&Utc)))
        .map_err(|err| ProvError::malformed(format!("invalid {} '{}': {}", key, text, err)))
}

fn as_object<'a>(value: &'a Value, what: &str) -> Result<&'a Object> {
    value
        .as_object()
        .ok_or_else(|| ProvError::malformed(format!("'{}' is not an object", what)))
}

fn as_str<'a>(value: &'a Value, what: &str) -> Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| ProvError::malformed(format!("'{}' is not a string", what)))
}
