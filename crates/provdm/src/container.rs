//! The provenance container: authoritative pool of nodes, relations and
//! accounts, plus the global namespace scope.

use crate::account::Account;
use crate::config::ContainerConfig;
use crate::error::{ProvError, Result};
use crate::namespace::{NameRef, NamespaceRegistry, QualifiedName, ResolutionContext};
use crate::relations::Relation;
use crate::types::{Activity, Agent, ElementKind, ElementRef, Entity, Node};
use crate::vocabulary::namespaces;
use indexmap::IndexMap;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Anything that can be added to a [`ProvContainer`].
#[derive(Debug, Clone)]
pub enum Element {
    Node(Node),
    Relation(Relation),
    Account(Account),
}

impl From<Node> for Element {
    fn from(value: Node) -> Self {
        Element::Node(value)
    }
}

impl From<Entity> for Element {
    fn from(value: Entity) -> Self {
        Element::Node(Node::Entity(value))
    }
}

impl From<Activity> for Element {
    fn from(value: Activity) -> Self {
        Element::Node(Node::Activity(value))
    }
}

impl From<Agent> for Element {
    fn from(value: Agent) -> Self {
        Element::Node(Node::Agent(value))
    }
}

impl From<Relation> for Element {
    fn from(value: Relation) -> Self {
        Element::Relation(value)
    }
}

impl From<Account> for Element {
    fn from(value: Account) -> Self {
        Element::Account(value)
    }
}

#[derive(Debug, Clone)]
pub struct ProvContainer {
    config: ContainerConfig,
    namespaces: NamespaceRegistry,
    default_namespace: Option<String>,
    nodes: IndexMap<QualifiedName, Node>,
    relations: IndexMap<QualifiedName, Relation>,
    accounts: IndexMap<QualifiedName, Account>,
    index: HashMap<QualifiedName, ElementKind>,
    blank_node_counter: u64,
}

impl ProvContainer {
    pub fn new() -> Self {
        Self::with_config(ContainerConfig::default())
    }

    pub fn with_config(config: ContainerConfig) -> Self {
        let namespaces = if config.well_known_namespaces {
            NamespaceRegistry::well_known(&config.blank_namespace)
        } else {
            NamespaceRegistry::new()
        };
        Self {
            config,
            namespaces,
            default_namespace: None,
            nodes: IndexMap::new(),
            relations: IndexMap::new(),
            accounts: IndexMap::new(),
            index: HashMap::new(),
            blank_node_counter: 0,
        }
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    pub fn set_default_namespace(&mut self, uri: &str) -> Result<()> {
        match &self.default_namespace {
            Some(existing) if existing == uri => Ok(()),
            Some(existing) => Err(log_rejection(ProvError::NamespaceConflict {
                prefix: namespaces::DEFAULT_KEY.to_string(),
                existing: existing.clone(),
                requested: uri.to_string(),
            })),
            None => {
                debug!(uri, "default namespace set");
                self.default_namespace = Some(uri.to_string());
                Ok(())
            }
        }
    }

    pub fn default_namespace(&self) -> Option<&str> {
        self.default_namespace.as_deref()
    }

    pub fn add_namespace(&mut self, prefix: &str, uri: &str) -> Result<()> {
        if self.namespaces.bind(prefix, uri).map_err(log_rejection)? {
            debug!(prefix, uri, "namespace bound");
        }
        Ok(())
    }

    pub fn namespaces(&self) -> &NamespaceRegistry {
        &self.namespaces
    }

    /// Global resolution scope: container bindings plus the default namespace.
    pub fn context(&self) -> ResolutionContext<'_> {
        ResolutionContext::new(&self.namespaces, self.default_namespace())
    }

    /// Scope for constructing elements under `account_id`.
    pub fn account_context(&self, account_id: &QualifiedName) -> Result<ResolutionContext<'_>> {
        let account = self.accounts.get(account_id).ok_or_else(|| unknown(account_id))?;
        Ok(account.context(&self.namespaces, self.default_namespace()))
    }

    /// Insert an element, returning its id (synthesized for anonymous
    /// relations). A rejected element leaves the container unchanged.
    pub fn add(&mut self, element: impl Into<Element>) -> Result<QualifiedName> {
        let element = element.into();
        let result = match element {
            Element::Node(node) => self.add_node(node),
            Element::Relation(relation) => self.add_relation(relation),
            Element::Account(account) => self.add_account(account),
        };
        result.map_err(log_rejection)
    }

    fn add_node(&mut self, node: Node) -> Result<QualifiedName> {
        let id = node.id().clone();
        self.ensure_unused(&id)?;
        debug!(id = %id, kind = node.kind().section(), "node added");
        self.index.insert(id.clone(), ElementKind::Node(node.kind()));
        self.nodes.insert(id.clone(), node);
        Ok(id)
    }

    fn add_relation(&mut self, mut relation: Relation) -> Result<QualifiedName> {
        let kind = relation.kind();
        for (role, target) in relation.endpoints() {
            let actual = self.index.get(target).ok_or_else(|| unknown(target))?;
            kind.check_endpoint(role, *actual)?;
        }
        let id = match relation.id().cloned() {
            Some(id) => {
                self.ensure_unused(&id)?;
                id
            }
            None => {
                let id = self.blank_node_id(kind.blank_tag());
                relation.assign_id(id.clone());
                id
            }
        };
        debug!(id = %id, kind = kind.section(), "relation added");
        self.index.insert(id.clone(), ElementKind::Relation(kind));
        self.relations.insert(id.clone(), relation);
        Ok(id)
    }

    fn add_account(&mut self, account: Account) -> Result<QualifiedName> {
        let id = account.id().clone();
        self.ensure_unused(&id)?;
        for member in account.members() {
            if !self.index.contains_key(member) {
                return Err(unknown(member));
            }
        }
        debug!(id = %id, asserter = %account.asserter(), "account added");
        self.index.insert(id.clone(), ElementKind::Account);
        self.accounts.insert(id.clone(), account);
        Ok(id)
    }

    /// Create an attribute-less entity and, when `account` is given, resolve
    /// its id in that account's scope and make it a member.
    pub fn add_entity(
        &mut self,
        id: impl Into<NameRef>,
        account: Option<&QualifiedName>,
    ) -> Result<QualifiedName> {
        let entity = match account {
            Some(account_id) => {
                let ctx = self.account_context(account_id).map_err(log_rejection)?;
                Entity::builder(id).build(&ctx)
            }
            None => Entity::builder(id).build(&self.context()),
        }
        .map_err(log_rejection)?;
        let id = self.add(entity)?;
        if let Some(account_id) = account {
            self.add_to_account(account_id, &id)?;
        }
        Ok(id)
    }

    /// Record that `account_id` asserts the existing element `element_id`.
    pub fn add_to_account(
        &mut self,
        account_id: &QualifiedName,
        element_id: &QualifiedName,
    ) -> Result<()> {
        if !self.index.contains_key(element_id) {
            return Err(log_rejection(unknown(element_id)));
        }
        let account = self
            .accounts
            .get_mut(account_id)
            .ok_or_else(|| log_rejection(unknown(account_id)))?;
        if account.insert_member(element_id.clone()) {
            debug!(account = %account_id, element = %element_id, "account member added");
        }
        Ok(())
    }

    pub fn add_account_namespace(
        &mut self,
        account_id: &QualifiedName,
        prefix: &str,
        uri: &str,
    ) -> Result<()> {
        let account = self
            .accounts
            .get_mut(account_id)
            .ok_or_else(|| log_rejection(unknown(account_id)))?;
        if account.add_namespace(prefix, uri).map_err(log_rejection)? {
            debug!(account = %account_id, prefix, uri, "account namespace bound");
        }
        Ok(())
    }

    pub fn node(&self, id: &QualifiedName) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn relation(&self, id: &QualifiedName) -> Option<&Relation> {
        self.relations.get(id)
    }

    pub fn account(&self, id: &QualifiedName) -> Option<&Account> {
        self.accounts.get(id)
    }

    pub fn kind_of(&self, id: &QualifiedName) -> Option<ElementKind> {
        self.index.get(id).copied()
    }

    pub fn element_ref(&self, id: &QualifiedName) -> Option<ElementRef> {
        self.kind_of(id).map(|kind| ElementRef::new(kind, id.clone()))
    }

    pub fn contains(&self, id: &QualifiedName) -> bool {
        self.index.contains_key(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn relations(&self) -> impl Iterator<Item = &Relation> {
        self.relations.values()
    }

    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    /// Number of elements of every kind.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    fn ensure_unused(&self, id: &QualifiedName) -> Result<()> {
        if self.index.contains_key(id) {
            return Err(ProvError::DuplicateIdentifier { id: id.to_string() });
        }
        Ok(())
    }

    fn blank_node_id(&mut self, tag: &str) -> QualifiedName {
        loop {
            self.blank_node_counter += 1;
            let id = QualifiedName::new(
                Some(namespaces::BLANK_PREFIX),
                self.config.blank_namespace.clone(),
                format!("{}{}", tag, self.blank_node_counter),
            );
            if !self.index.contains_key(&id) {
                return id;
            }
        }
    }
}

impl Default for ProvContainer {
    fn default() -> Self {
        Self::new()
    }
}

fn unknown(id: &QualifiedName) -> ProvError {
    ProvError::UnknownNode { id: id.to_string() }
}

fn log_rejection(err: ProvError) -> ProvError {
    warn!(error = %err, "provenance element rejected");
    err
}
