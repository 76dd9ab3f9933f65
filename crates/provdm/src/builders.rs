use crate::account::Account;
use crate::error::{ProvError, Result};
use crate::namespace::{Namespace, NameRef, NamespaceRegistry, ResolutionContext};
use crate::relations::{Relation, RelationKind, Role};
use crate::types::{Activity, Agent, AttrKey, AttrValue, Attributes, ElementRef, Entity};
use chrono::{DateTime, Utc};

type PendingAttributes = Vec<(NameRef, AttrValue)>;

fn resolve_attributes(ctx: &ResolutionContext<'_>, pending: PendingAttributes) -> Result<Attributes> {
    let mut attributes = Attributes::new();
    for (key, value) in pending {
        let key = AttrKey::resolve(ctx, key)?;
        let value = value.normalize_for(&key, ctx);
        attributes.insert(key, value);
    }
    Ok(attributes)
}

#[derive(Debug, Clone)]
pub struct EntityBuilder {
    id: NameRef,
    attributes: PendingAttributes,
}

impl EntityBuilder {
    pub fn new(id: impl Into<NameRef>) -> Self {
        Self { id: id.into(), attributes: Vec::new() }
    }

    pub fn attr(mut self, key: impl Into<NameRef>, value: impl Into<AttrValue>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    pub fn build(self, ctx: &ResolutionContext<'_>) -> Result<Entity> {
        let id = ctx.resolve(self.id)?;
        Ok(Entity::new(id, resolve_attributes(ctx, self.attributes)?))
    }
}

#[derive(Debug, Clone)]
pub struct ActivityBuilder {
    id: NameRef,
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
    attributes: PendingAttributes,
}

impl ActivityBuilder {
    pub fn new(id: impl Into<NameRef>) -> Self {
        Self { id: id.into(), start_time: None, end_time: None, attributes: Vec::new() }
    }

    pub fn start_time(mut self, time: DateTime<Utc>) -> Self {
        self.start_time = Some(time);
        self
    }

    pub fn end_time(mut self, time: DateTime<Utc>) -> Self {
        self.end_time = Some(time);
        self
    }

    pub fn attr(mut self, key: impl Into<NameRef>, value: impl Into<AttrValue>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    pub fn build(self, ctx: &ResolutionContext<'_>) -> Result<Activity> {
        let id = ctx.resolve(self.id)?;
        if let (Some(start), Some(end)) = (self.start_time, self.end_time) {
            if end < start {
                return Err(ProvError::InvalidTimeRange { id: id.to_string() });
            }
        }
        let attributes = resolve_attributes(ctx, self.attributes)?;
        Ok(Activity::new(id, self.start_time, self.end_time, attributes))
    }
}

#[derive(Debug, Clone)]
pub struct AgentBuilder {
    id: NameRef,
    attributes: PendingAttributes,
}

impl AgentBuilder {
    pub fn new(id: impl Into<NameRef>) -> Self {
        Self { id: id.into(), attributes: Vec::new() }
    }

    pub fn attr(mut self, key: impl Into<NameRef>, value: impl Into<AttrValue>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    pub fn build(self, ctx: &ResolutionContext<'_>) -> Result<Agent> {
        let id = ctx.resolve(self.id)?;
        Ok(Agent::new(id, resolve_attributes(ctx, self.attributes)?))
    }
}

/// Builder for any relation kind. Endpoint kinds are checked as each
/// endpoint is attached; names are resolved in [`RelationBuilder::build`].
#[derive(Debug, Clone)]
pub struct RelationBuilder {
    kind: RelationKind,
    id: Option<NameRef>,
    endpoints: Vec<(Role, ElementRef)>,
    time: Option<DateTime<Utc>>,
    attributes: PendingAttributes,
}

impl RelationBuilder {
    pub(crate) fn new(kind: RelationKind) -> Self {
        Self { kind, id: None, endpoints: Vec::new(), time: None, attributes: Vec::new() }
    }

    pub fn kind(&self) -> RelationKind {
        self.kind
    }

    pub fn id(mut self, id: impl Into<NameRef>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn time(mut self, time: DateTime<Utc>) -> Self {
        self.time = Some(time);
        self
    }

    pub fn attr(mut self, key: impl Into<NameRef>, value: impl Into<AttrValue>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// Fill `role`, replacing any earlier endpoint in that role.
    pub fn with(mut self, role: Role, target: impl Into<ElementRef>) -> Result<Self> {
        let target = target.into();
        self.kind.check_endpoint(role, target.kind)?;
        self.endpoints.retain(|(existing, _)| *existing != role);
        self.endpoints.push((role, target));
        Ok(self)
    }

    pub fn activity(self, activity: impl Into<ElementRef>) -> Result<Self> {
        self.with(Role::Activity, activity)
    }

    pub fn generation(self, generation: impl Into<ElementRef>) -> Result<Self> {
        self.with(Role::Generation, generation)
    }

    pub fn usage(self, usage: impl Into<ElementRef>) -> Result<Self> {
        self.with(Role::Usage, usage)
    }

    pub fn plan(self, plan: impl Into<ElementRef>) -> Result<Self> {
        self.with(Role::Plan, plan)
    }

    pub fn build(self, ctx: &ResolutionContext<'_>) -> Result<Relation> {
        let id = self.id.map(|id| ctx.resolve(id)).transpose()?;
        let endpoints = self.endpoints.into_iter().map(|(role, target)| (role, target.id)).collect();
        let attributes = resolve_attributes(ctx, self.attributes)?;
        Ok(Relation::new(self.kind, id, endpoints, self.time, attributes))
    }
}

#[derive(Debug, Clone)]
pub struct AccountBuilder {
    id: NameRef,
    asserter: NameRef,
    namespaces: Vec<Namespace>,
    attributes: PendingAttributes,
}

impl AccountBuilder {
    pub fn new(id: impl Into<NameRef>, asserter: impl Into<NameRef>) -> Self {
        Self { id: id.into(), asserter: asserter.into(), namespaces: Vec::new(), attributes: Vec::new() }
    }

    /// Bind a prefix in the account's local scope before anything resolves.
    pub fn namespace(mut self, prefix: &str, uri: &str) -> Self {
        self.namespaces.push(Namespace::new(prefix, uri));
        self
    }

    pub fn attr(mut self, key: impl Into<NameRef>, value: impl Into<AttrValue>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// The account's own names resolve with its local bindings in scope.
    pub fn build(self, ctx: &ResolutionContext<'_>) -> Result<Account> {
        let mut local = NamespaceRegistry::new();
        for namespace in &self.namespaces {
            local.bind_namespace(namespace)?;
        }
        let scoped = ctx.with_local(&local);
        let id = scoped.resolve(self.id)?;
        let asserter = scoped.resolve(self.asserter)?;
        let attributes = resolve_attributes(&scoped, self.attributes)?;
        Ok(Account::new(id, asserter, local, attributes))
    }
}
