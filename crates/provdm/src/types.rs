use crate::builders::{ActivityBuilder, AgentBuilder, EntityBuilder};
use crate::error::Result;
use crate::literal::ProvLiteral;
use crate::namespace::{NameRef, QualifiedName, ResolutionContext};
use crate::relations::RelationKind;
use crate::vocabulary::{keys, namespaces, sections};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::fmt;

/// Attribute key: the reserved `type` key or a qualified name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttrKey {
    Type,
    Name(QualifiedName),
}

impl AttrKey {
    pub fn resolve(ctx: &ResolutionContext<'_>, name: NameRef) -> Result<Self> {
        if matches!(&name, NameRef::Text(text) if text == keys::TYPE) {
            return Ok(AttrKey::Type);
        }
        let qname = ctx.resolve(name)?;
        if qname.is_in(namespaces::PROV) && qname.local_name() == keys::TYPE {
            Ok(AttrKey::Type)
        } else {
            Ok(AttrKey::Name(qname))
        }
    }
}

impl From<QualifiedName> for AttrKey {
    fn from(value: QualifiedName) -> Self {
        AttrKey::Name(value)
    }
}

/// Attribute value. Lists never nest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    Str(String),
    Ref(QualifiedName),
    Lit(ProvLiteral),
    List(Vec<AttrValue>),
}

impl AttrValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Str(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_ref_name(&self) -> Option<&QualifiedName> {
        match self {
            AttrValue::Ref(qname) => Some(qname),
            _ => None,
        }
    }

    pub fn values(&self) -> &[AttrValue] {
        match self {
            AttrValue::List(values) => values,
            single => std::slice::from_ref(single),
        }
    }

    fn into_values(self) -> Vec<AttrValue> {
        match self {
            AttrValue::List(values) => values,
            single => vec![single],
        }
    }

    /// Under the `type` key a resolvable `prefix:local` string is a reference.
    pub(crate) fn normalize_for(self, key: &AttrKey, ctx: &ResolutionContext<'_>) -> Self {
        if *key != AttrKey::Type {
            return self;
        }
        match self {
            AttrValue::Str(text) => match ctx.resolve_reference(&text) {
                Some(qname) => AttrValue::Ref(qname),
                None => AttrValue::Str(text),
            },
            AttrValue::List(values) => AttrValue::List(
                values.into_iter().map(|value| value.normalize_for(key, ctx)).collect(),
            ),
            other => other,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Str(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Str(value)
    }
}

impl From<QualifiedName> for AttrValue {
    fn from(value: QualifiedName) -> Self {
        AttrValue::Ref(value)
    }
}

impl From<&QualifiedName> for AttrValue {
    fn from(value: &QualifiedName) -> Self {
        AttrValue::Ref(value.clone())
    }
}

impl From<ProvLiteral> for AttrValue {
    fn from(value: ProvLiteral) -> Self {
        AttrValue::Lit(value)
    }
}

impl<T: Into<AttrValue>> From<Vec<T>> for AttrValue {
    fn from(values: Vec<T>) -> Self {
        AttrValue::List(
            values
                .into_iter()
                .flat_map(|value| Into::<AttrValue>::into(value).into_values())
                .collect(),
        )
    }
}

/// Insertion-ordered attribute set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: IndexMap<AttrKey, AttrValue>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value; a second value under the same key extends a list.
    pub fn insert(&mut self, key: AttrKey, value: AttrValue) {
        match self.entries.get_mut(&key) {
            Some(existing) => {
                let mut values = std::mem::replace(existing, AttrValue::List(Vec::new())).into_values();
                values.extend(value.into_values());
                *existing = AttrValue::List(values);
            }
            None => {
                self.entries.insert(key, value);
            }
        }
    }

    pub fn get(&self, key: &AttrKey) -> Option<&AttrValue> {
        self.entries.get(key)
    }

    pub fn prov_type(&self) -> Option<&AttrValue> {
        self.entries.get(&AttrKey::Type)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AttrKey, &AttrValue)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Entity,
    Activity,
    Agent,
}

impl NodeKind {
    pub fn section(&self) -> &'static str {
        match self {
            NodeKind::Entity => sections::ENTITY,
            NodeKind::Activity => sections::ACTIVITY,
            NodeKind::Agent => sections::AGENT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    id: QualifiedName,
    attributes: Attributes,
}

impl Entity {
    pub fn new(id: QualifiedName, attributes: Attributes) -> Self {
        Self { id, attributes }
    }

    pub fn builder(id: impl Into<NameRef>) -> EntityBuilder {
        EntityBuilder::new(id)
    }

    pub fn id(&self) -> &QualifiedName {
        &self.id
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    id: QualifiedName,
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
    attributes: Attributes,
}

impl Activity {
    pub(crate) fn new(
        id: QualifiedName,
        start_time: Option<DateTime<Utc>>,
        end_time: Option<DateTime<Utc>>,
        attributes: Attributes,
    ) -> Self {
        Self { id, start_time, end_time, attributes }
    }

    pub fn builder(id: impl Into<NameRef>) -> ActivityBuilder {
        ActivityBuilder::new(id)
    }

    pub fn id(&self) -> &QualifiedName {
        &self.id
    }

    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Agent {
    id: QualifiedName,
    attributes: Attributes,
}

impl Agent {
    pub fn new(id: QualifiedName, attributes: Attributes) -> Self {
        Self { id, attributes }
    }

    pub fn builder(id: impl Into<NameRef>) -> AgentBuilder {
        AgentBuilder::new(id)
    }

    pub fn id(&self) -> &QualifiedName {
        &self.id
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Entity(Entity),
    Activity(Activity),
    Agent(Agent),
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Entity(_) => NodeKind::Entity,
            Node::Activity(_) => NodeKind::Activity,
            Node::Agent(_) => NodeKind::Agent,
        }
    }

    pub fn id(&self) -> &QualifiedName {
        match self {
            Node::Entity(node) => node.id(),
            Node::Activity(node) => node.id(),
            Node::Agent(node) => node.id(),
        }
    }

    pub fn attributes(&self) -> &Attributes {
        match self {
            Node::Entity(node) => node.attributes(),
            Node::Activity(node) => node.attributes(),
            Node::Agent(node) => node.attributes(),
        }
    }
}

impl From<Entity> for Node {
    fn from(value: Entity) -> Self {
        Node::Entity(value)
    }
}

impl From<Activity> for Node {
    fn from(value: Activity) -> Self {
        Node::Activity(value)
    }
}

impl From<Agent> for Node {
    fn from(value: Agent) -> Self {
        Node::Agent(value)
    }
}

/// Kind of anything the container can hold under an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Node(NodeKind),
    Relation(RelationKind),
    Account,
}

impl ElementKind {
    pub fn section(&self) -> &'static str {
        match self {
            ElementKind::Node(kind) => kind.section(),
            ElementKind::Relation(kind) => kind.section(),
            ElementKind::Account => sections::ACCOUNT,
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.section())
    }
}

/// A typed pointer to an element by id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementRef {
    pub kind: ElementKind,
    pub id: QualifiedName,
}

impl ElementRef {
    pub fn new(kind: ElementKind, id: QualifiedName) -> Self {
        Self { kind, id }
    }

    pub fn entity(id: QualifiedName) -> Self {
        Self::new(ElementKind::Node(NodeKind::Entity), id)
    }

    pub fn activity(id: QualifiedName) -> Self {
        Self::new(ElementKind::Node(NodeKind::Activity), id)
    }

    pub fn agent(id: QualifiedName) -> Self {
        Self::new(ElementKind::Node(NodeKind::Agent), id)
    }

    pub fn relation(kind: RelationKind, id: QualifiedName) -> Self {
        Self::new(ElementKind::Relation(kind), id)
    }
}

impl From<&Entity> for ElementRef {
    fn from(value: &Entity) -> Self {
        ElementRef::new(ElementKind::Node(NodeKind::Entity), value.id.clone())
    }
}

impl From<&Activity> for ElementRef {
    fn from(value: &Activity) -> Self {
        ElementRef::new(ElementKind::Node(NodeKind::Activity), value.id.clone())
    }
}

impl From<&Agent> for ElementRef {
    fn from(value: &Agent) -> Self {
        ElementRef::new(ElementKind::Node(NodeKind::Agent), value.id.clone())
    }
}

impl From<&Node> for ElementRef {
    fn from(value: &Node) -> Self {
        ElementRef::new(ElementKind::Node(value.kind()), value.id().clone())
    }
}
