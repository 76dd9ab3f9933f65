//! Namespaces, qualified names and scoped name resolution.
//!
//! Resolution never consults ambient state: every call that turns text into a
//! [`QualifiedName`] receives a [`ResolutionContext`] naming the scopes it may
//! use, in lookup order local → global → default namespace.

use crate::error::{ProvError, Result};
use crate::vocabulary::{self, namespaces};
use indexmap::IndexMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A namespace-scoped identifier.
///
/// Equality and hashing use only the expanded URI, so the same name reached
/// through a prefix or split differently from a full URI compares equal. The
/// prefix records how the name was spelled when created.
#[derive(Debug, Clone)]
pub struct QualifiedName {
    prefix: Option<String>,
    namespace: String,
    local: String,
}

impl QualifiedName {
    pub fn new(
        prefix: Option<&str>,
        namespace: impl Into<String>,
        local: impl Into<String>,
    ) -> Self {
        Self {
            prefix: prefix.map(str::to_string),
            namespace: namespace.into(),
            local: local.into(),
        }
    }

    /// Split an absolute URI at its last `#`, `/` or `:`.
    pub fn from_uri(uri: &str) -> Self {
        match uri.rfind(['#', '/', ':']) {
            Some(idx) => Self::new(None, &uri[..=idx], &uri[idx + 1..]),
            None => Self::new(None, "", uri),
        }
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn local_name(&self) -> &str {
        &self.local
    }

    pub fn uri(&self) -> String {
        format!("{}{}", self.namespace, self.local)
    }

    pub fn is_in(&self, namespace: &str) -> bool {
        self.namespace == namespace
    }
}

impl PartialEq for QualifiedName {
    fn eq(&self, other: &Self) -> bool {
        self.namespace.len() + self.local.len() == other.namespace.len() + other.local.len()
            && self
                .namespace
                .bytes()
                .chain(self.local.bytes())
                .eq(other.namespace.bytes().chain(other.local.bytes()))
    }
}

impl Eq for QualifiedName {}

impl Hash for QualifiedName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.uri().hash(state);
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.prefix {
            Some(prefix) => write!(f, "{}:{}", prefix, self.local),
            None => write!(f, "{}{}", self.namespace, self.local),
        }
    }
}

/// A prefix bound to a namespace URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    prefix: String,
    uri: String,
}

impl Namespace {
    pub fn new(prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        Self { prefix: prefix.into(), uri: uri.into() }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn qname(&self, local: impl Into<String>) -> QualifiedName {
        QualifiedName::new(Some(&self.prefix), self.uri.clone(), local)
    }
}

/// Prefix → URI bindings for a single scope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceRegistry {
    bindings: IndexMap<String, String>,
}

impl NamespaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-bound with `prov`, `xsd` and `_` → `blank_namespace`.
    pub fn well_known(blank_namespace: &str) -> Self {
        let mut bindings = IndexMap::new();
        bindings.insert(namespaces::PROV_PREFIX.to_string(), namespaces::PROV.to_string());
        bindings.insert(namespaces::XSD_PREFIX.to_string(), namespaces::XSD.to_string());
        bindings.insert(namespaces::BLANK_PREFIX.to_string(), blank_namespace.to_string());
        Self { bindings }
    }

    /// Bind `prefix` to `uri`. Returns `Ok(false)` when the identical binding
    /// already exists.
    pub fn bind(&mut self, prefix: &str, uri: &str) -> Result<bool> {
        match self.bindings.get(prefix) {
            Some(existing) if existing == uri => Ok(false),
            Some(existing) => Err(ProvError::NamespaceConflict {
                prefix: prefix.to_string(),
                existing: existing.clone(),
                requested: uri.to_string(),
            }),
            None => {
                self.bindings.insert(prefix.to_string(), uri.to_string());
                Ok(true)
            }
        }
    }

    pub fn bind_namespace(&mut self, namespace: &Namespace) -> Result<bool> {
        self.bind(namespace.prefix(), namespace.uri())
    }

    pub fn get(&self, prefix: &str) -> Option<&str> {
        self.bindings.get(prefix).map(String::as_str)
    }

    pub fn contains(&self, prefix: &str) -> bool {
        self.bindings.contains_key(prefix)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bindings.iter().map(|(p, u)| (p.as_str(), u.as_str()))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Unresolved name input: an already qualified name or text to resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameRef {
    Qualified(QualifiedName),
    Text(String),
}

impl From<QualifiedName> for NameRef {
    fn from(value: QualifiedName) -> Self {
        NameRef::Qualified(value)
    }
}

impl From<&QualifiedName> for NameRef {
    fn from(value: &QualifiedName) -> Self {
        NameRef::Qualified(value.clone())
    }
}

impl From<&str> for NameRef {
    fn from(value: &str) -> Self {
        NameRef::Text(value.to_string())
    }
}

impl From<String> for NameRef {
    fn from(value: String) -> Self {
        NameRef::Text(value)
    }
}

impl From<&String> for NameRef {
    fn from(value: &String) -> Self {
        NameRef::Text(value.clone())
    }
}

/// Where a shortened name is going to appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameUsage {
    /// Element ids and endpoint references.
    Identifier,
    /// Attribute keys.
    Key,
    /// Attribute values, which never render bare.
    Value,
}

/// The scopes a resolution or rendering call may consult.
#[derive(Debug, Clone, Copy)]
pub struct ResolutionContext<'a> {
    pub local: Option<&'a NamespaceRegistry>,
    pub global: &'a NamespaceRegistry,
    pub default_namespace: Option<&'a str>,
}

impl<'a> ResolutionContext<'a> {
    pub fn new(global: &'a NamespaceRegistry, default_namespace: Option<&'a str>) -> Self {
        Self { local: None, global, default_namespace }
    }

    pub fn with_local(mut self, local: &'a NamespaceRegistry) -> Self {
        self.local = Some(local);
        self
    }

    pub fn lookup(&self, prefix: &str) -> Option<&'a str> {
        self.local
            .and_then(|local| local.get(prefix))
            .or_else(|| self.global.get(prefix))
    }

    pub fn resolve(&self, name: impl Into<NameRef>) -> Result<QualifiedName> {
        match name.into() {
            NameRef::Qualified(qname) => Ok(qname),
            NameRef::Text(text) => self.resolve_str(&text),
        }
    }

    pub fn resolve_str(&self, text: &str) -> Result<QualifiedName> {
        if let Some(qname) = self.resolve_reference(text) {
            return Ok(qname);
        }
        match text.split_once(':') {
            Some((prefix, _)) => Err(ProvError::UnresolvedPrefix {
                prefix: prefix.to_string(),
                name: text.to_string(),
            }),
            None => match self.default_namespace {
                Some(default) => Ok(QualifiedName::new(None, default, text)),
                None => Err(ProvError::UnresolvedPrefix {
                    prefix: String::new(),
                    name: text.to_string(),
                }),
            },
        }
    }

    /// Resolve `prefix:local` or an absolute URI; bare names yield `None`.
    pub fn resolve_reference(&self, text: &str) -> Option<QualifiedName> {
        let (prefix, local) = text.split_once(':')?;
        if let Some(uri) = self.lookup(prefix) {
            return Some(QualifiedName::new(Some(prefix), uri, local));
        }
        if looks_like_uri(prefix, local) {
            return Some(QualifiedName::from_uri(text));
        }
        None
    }

    /// Effective bindings: local entries shadow global ones with the same prefix.
    pub fn bindings(&self) -> impl Iterator<Item = (&'a str, &'a str)> + '_ {
        let local = self.local.into_iter().flat_map(NamespaceRegistry::iter);
        let global = self
            .global
            .iter()
            .filter(move |(prefix, _)| !self.local.is_some_and(|l| l.contains(prefix)));
        local.chain(global)
    }

    /// Shortest form of `qname` that resolves back to it in this scope,
    /// falling back to the full URI. Bindings match on the expanded URI, not
    /// on how the name happens to be split.
    pub fn shorten(&self, qname: &QualifiedName, usage: NameUsage) -> String {
        let uri = qname.uri();
        if usage != NameUsage::Value {
            let bare = self
                .default_namespace
                .and_then(|default| local_part(&uri, default))
                .filter(|local| !local.contains(':'))
                .filter(|local| !(usage == NameUsage::Key && vocabulary::is_reserved_key(local)));
            if let Some(local) = bare {
                return local.to_string();
            }
        }
        let shortened = self
            .bindings()
            .filter_map(|(prefix, namespace)| local_part(&uri, namespace).map(|local| (prefix, local)))
            .min_by(|(a, _), (b, _)| a.len().cmp(&b.len()).then_with(|| a.cmp(b)))
            .map(|(prefix, local)| format!("{}:{}", prefix, local));
        shortened.unwrap_or(uri)
    }
}

fn local_part<'u>(uri: &'u str, namespace: &str) -> Option<&'u str> {
    uri.strip_prefix(namespace).filter(|local| !local.is_empty())
}

fn looks_like_uri(scheme: &str, rest: &str) -> bool {
    !scheme.is_empty()
        && scheme.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        && (rest.starts_with("//") || scheme == "urn")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn global() -> NamespaceRegistry {
        let mut registry = NamespaceRegistry::well_known(namespaces::BLANK);
        registry.bind("foaf", "http://xmlns.com/foaf/0.1/").unwrap();
        registry.bind("f", "http://xmlns.com/foaf/0.1/").unwrap();
        registry
    }

    #[test]
    fn shorten_prefers_shortest_prefix() {
        let global = global();
        let ctx = ResolutionContext::new(&global, None);
        let alice = Namespace::new("foaf", "http://xmlns.com/foaf/0.1/").qname("Alice");
        assert_eq!(ctx.shorten(&alice, NameUsage::Value), "f:Alice");
    }

    #[test]
    fn shorten_keeps_reserved_keys_prefixed() {
        let global = global();
        let ctx = ResolutionContext::new(&global, Some("http://xmlns.com/foaf/0.1/"));
        let key = QualifiedName::new(None, "http://xmlns.com/foaf/0.1/", "type");
        assert_eq!(ctx.shorten(&key, NameUsage::Key), "f:type");
        assert_eq!(ctx.shorten(&key, NameUsage::Identifier), "type");
    }

    #[test]
    fn local_binding_shadows_global_prefix() {
        let mut global = global();
        global.bind("ex", "http://www.example.com/").unwrap();
        let mut local = NamespaceRegistry::new();
        local.bind("ex", "http://www.example2222.com/").unwrap();
        let ctx = ResolutionContext::new(&global, None).with_local(&local);

        let resolved = ctx.resolve("ex:e2").unwrap();
        assert_eq!(resolved.uri(), "http://www.example2222.com/e2");

        let shadowed = QualifiedName::new(None, "http://www.example.com/", "e2");
        assert_eq!(ctx.shorten(&shadowed, NameUsage::Identifier), "http://www.example.com/e2");
    }

    #[test]
    fn names_compare_by_expanded_uri() {
        let split = QualifiedName::new(Some("t"), "http://t.org/ns", "x");
        let parsed = QualifiedName::from_uri("http://t.org/nsx");
        assert_eq!(parsed.namespace(), "http://t.org/");
        assert_eq!(split, parsed);

        let mut seen = std::collections::HashSet::new();
        seen.insert(split);
        assert!(seen.contains(&parsed));
        assert_ne!(
            QualifiedName::new(None, "http://t.org/ns", "x"),
            QualifiedName::new(None, "http://t.org/n", "x")
        );
    }

    #[test]
    fn shorten_matches_bindings_on_expanded_uri() {
        let mut global = NamespaceRegistry::new();
        global.bind("t", "http://t.org/ns").unwrap();
        let ctx = ResolutionContext::new(&global, None);
        let parsed = QualifiedName::from_uri("http://t.org/nsx");
        assert_eq!(ctx.shorten(&parsed, NameUsage::Value), "t:x");
        assert_eq!(ctx.resolve_str("t:x").unwrap(), parsed);
    }

    #[test]
    fn full_uri_splits_at_last_separator() {
        let global = NamespaceRegistry::well_known(namespaces::BLANK);
        let ctx = ResolutionContext::new(&global, None);
        let qname = ctx.resolve("http://www.example.org/testns").unwrap();
        assert_eq!(qname.namespace(), "http://www.example.org/");
        assert_eq!(qname.local_name(), "testns");
    }
}
