//! Accounts: named, asserter-attributed views over the container's pool.
//!
//! An account owns nothing but its header (id, asserter, attributes) and its
//! local namespace scope. Membership is a set of ids pointing into the
//! container's pools, so the same element can be asserted by several accounts
//! without being copied.

use crate::builders::AccountBuilder;
use crate::error::Result;
use crate::namespace::{NameRef, NamespaceRegistry, QualifiedName, ResolutionContext};
use crate::types::Attributes;
use indexmap::IndexSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    id: QualifiedName,
    asserter: QualifiedName,
    namespaces: NamespaceRegistry,
    attributes: Attributes,
    members: IndexSet<QualifiedName>,
}

impl Account {
    pub(crate) fn new(
        id: QualifiedName,
        asserter: QualifiedName,
        namespaces: NamespaceRegistry,
        attributes: Attributes,
    ) -> Self {
        Self { id, asserter, namespaces, attributes, members: IndexSet::new() }
    }

    pub fn builder(id: impl Into<NameRef>, asserter: impl Into<NameRef>) -> AccountBuilder {
        AccountBuilder::new(id, asserter)
    }

    pub fn id(&self) -> &QualifiedName {
        &self.id
    }

    pub fn asserter(&self) -> &QualifiedName {
        &self.asserter
    }

    pub fn namespaces(&self) -> &NamespaceRegistry {
        &self.namespaces
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Bind a prefix in this account's scope. The container's global scope is
    /// shadowed, never modified.
    pub fn add_namespace(&mut self, prefix: &str, uri: &str) -> Result<bool> {
        self.namespaces.bind(prefix, uri)
    }

    pub fn members(&self) -> impl Iterator<Item = &QualifiedName> {
        self.members.iter()
    }

    pub fn contains(&self, id: &QualifiedName) -> bool {
        self.members.contains(id)
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub(crate) fn insert_member(&mut self, id: QualifiedName) -> bool {
        self.members.insert(id)
    }

    /// Resolution scope for elements constructed under this account.
    pub fn context<'a>(
        &'a self,
        global: &'a NamespaceRegistry,
        default_namespace: Option<&'a str>,
    ) -> ResolutionContext<'a> {
        ResolutionContext::new(global, default_namespace).with_local(&self.namespaces)
    }
}
