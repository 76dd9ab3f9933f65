//! W3C PROV data model and PROV-JSON serialization.
//!
//! This crate provides namespace-qualified names, typed literals, nodes and
//! signature-checked relations, accounts that share elements by reference,
//! and a container that renders to (and parses from) a PROV-JSON document.

pub mod error;
pub mod vocabulary;
pub mod namespace;
pub mod literal;
pub mod types;
pub mod relations;
pub mod builders;
pub mod account;
pub mod config;
pub mod container;
pub mod serializer;
pub mod parser;

pub use account::Account;
pub use builders::{ActivityBuilder, AccountBuilder, AgentBuilder, EntityBuilder, RelationBuilder};
pub use config::{ContainerConfig, SerializerConfig};
pub use container::{Element, ProvContainer};
pub use error::{ProvError, Result};
pub use literal::ProvLiteral;
pub use namespace::{NameRef, NameUsage, Namespace, NamespaceRegistry, QualifiedName, ResolutionContext};
pub use parser::{parse_document, parse_str};
pub use relations::{Relation, RelationKind, Role};
pub use serializer::{render, Document, Serializer};
pub use types::{
    Activity, Agent, AttrKey, AttrValue, Attributes, ElementKind, ElementRef, Entity, Node, NodeKind,
};
