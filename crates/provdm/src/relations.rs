//! Typed PROV relations and their endpoint signatures.

use crate::builders::RelationBuilder;
use crate::error::{ProvError, Result};
use crate::namespace::QualifiedName;
use crate::types::{Attributes, ElementKind, ElementRef, NodeKind};
use crate::vocabulary::{roles, sections};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationKind {
    Generation,
    Usage,
    Communication,
    Start,
    End,
    Invalidation,
    Derivation,
    Attribution,
    Association,
    Delegation,
    Specialization,
    Alternate,
}

impl RelationKind {
    /// Section order used by the serializer. Generation and Usage precede
    /// Derivation so a parser meets referenced relations first.
    pub const ALL: [RelationKind; 12] = [
        RelationKind::Generation,
        RelationKind::Usage,
        RelationKind::Communication,
        RelationKind::Start,
        RelationKind::End,
        RelationKind::Invalidation,
        RelationKind::Derivation,
        RelationKind::Attribution,
        RelationKind::Association,
        RelationKind::Delegation,
        RelationKind::Specialization,
        RelationKind::Alternate,
    ];

    pub fn section(&self) -> &'static str {
        match self {
            RelationKind::Generation => sections::WAS_GENERATED_BY,
            RelationKind::Usage => sections::USED,
            RelationKind::Communication => sections::WAS_INFORMED_BY,
            RelationKind::Start => sections::WAS_STARTED_BY,
            RelationKind::End => sections::WAS_ENDED_BY,
            RelationKind::Invalidation => sections::WAS_INVALIDATED_BY,
            RelationKind::Derivation => sections::WAS_DERIVED_FROM,
            RelationKind::Attribution => sections::WAS_ATTRIBUTED_TO,
            RelationKind::Association => sections::WAS_ASSOCIATED_WITH,
            RelationKind::Delegation => sections::ACTED_ON_BEHALF_OF,
            RelationKind::Specialization => sections::SPECIALIZATION_OF,
            RelationKind::Alternate => sections::ALTERNATE_OF,
        }
    }

    pub fn from_section(section: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.section() == section)
    }

    /// Local-name prefix of synthesized blank ids.
    pub fn blank_tag(&self) -> &'static str {
        match self {
            RelationKind::Generation => "g",
            RelationKind::Usage => "u",
            RelationKind::Communication => "inf",
            RelationKind::Start => "start",
            RelationKind::End => "end",
            RelationKind::Invalidation => "inv",
            RelationKind::Derivation => "d",
            RelationKind::Attribution => "attr",
            RelationKind::Association => "assoc",
            RelationKind::Delegation => "del",
            RelationKind::Specialization => "spec",
            RelationKind::Alternate => "alt",
        }
    }

    pub fn required_roles(&self) -> &'static [Role] {
        match self {
            RelationKind::Generation | RelationKind::Invalidation => &[Role::Entity, Role::Activity],
            RelationKind::Usage => &[Role::Activity, Role::Entity],
            RelationKind::Communication => &[Role::Informed, Role::Informant],
            RelationKind::Start | RelationKind::End => &[Role::Activity, Role::Trigger],
            RelationKind::Derivation => &[Role::GeneratedEntity, Role::UsedEntity],
            RelationKind::Attribution => &[Role::Entity, Role::Agent],
            RelationKind::Association => &[Role::Activity, Role::Agent],
            RelationKind::Delegation => &[Role::Delegate, Role::Responsible],
            RelationKind::Specialization => &[Role::SpecificEntity, Role::GeneralEntity],
            RelationKind::Alternate => &[Role::Alternate1, Role::Alternate2],
        }
    }

    pub fn optional_roles(&self) -> &'static [Role] {
        match self {
            RelationKind::Derivation => &[Role::Activity, Role::Generation, Role::Usage],
            RelationKind::Association => &[Role::Plan],
            RelationKind::Delegation => &[Role::Activity],
            _ => &[],
        }
    }

    pub fn roles(&self) -> impl Iterator<Item = Role> {
        self.required_roles().iter().chain(self.optional_roles()).copied()
    }

    fn position(&self, role: Role) -> Option<usize> {
        self.roles().position(|candidate| candidate == role)
    }

    /// Check that `target` may fill `role` in this relation.
    pub fn check_endpoint(&self, role: Role, target: ElementKind) -> Result<()> {
        if self.position(role).is_none() {
            return Err(self.signature_error(role, "no such role", target));
        }
        if role.expected() != target {
            return Err(self.signature_error(role, role.expected().section(), target));
        }
        Ok(())
    }

    fn signature_error(&self, role: Role, expected: &str, actual: ElementKind) -> ProvError {
        ProvError::InvalidRelationSignature {
            relation: self.section().to_string(),
            role: role.key().to_string(),
            expected: expected.to_string(),
            actual: actual.section().to_string(),
        }
    }
}

/// Named endpoint position inside a relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Entity,
    Activity,
    Agent,
    GeneratedEntity,
    UsedEntity,
    Generation,
    Usage,
    Informed,
    Informant,
    Trigger,
    Plan,
    Delegate,
    Responsible,
    SpecificEntity,
    GeneralEntity,
    Alternate1,
    Alternate2,
}

impl Role {
    pub fn key(&self) -> &'static str {
        match self {
            Role::Entity => roles::ENTITY,
            Role::Activity => roles::ACTIVITY,
            Role::Agent => roles::AGENT,
            Role::GeneratedEntity => roles::GENERATED_ENTITY,
            Role::UsedEntity => roles::USED_ENTITY,
            Role::Generation => roles::GENERATION,
            Role::Usage => roles::USAGE,
            Role::Informed => roles::INFORMED,
            Role::Informant => roles::INFORMANT,
            Role::Trigger => roles::TRIGGER,
            Role::Plan => roles::PLAN,
            Role::Delegate => roles::DELEGATE,
            Role::Responsible => roles::RESPONSIBLE,
            Role::SpecificEntity => roles::SPECIFIC_ENTITY,
            Role::GeneralEntity => roles::GENERAL_ENTITY,
            Role::Alternate1 => roles::ALTERNATE_1,
            Role::Alternate2 => roles::ALTERNATE_2,
        }
    }

    pub fn expected(&self) -> ElementKind {
        match self {
            Role::Entity
            | Role::GeneratedEntity
            | Role::UsedEntity
            | Role::Trigger
            | Role::Plan
            | Role::SpecificEntity
            | Role::GeneralEntity
            | Role::Alternate1
            | Role::Alternate2 => ElementKind::Node(NodeKind::Entity),
            Role::Activity | Role::Informed | Role::Informant => {
                ElementKind::Node(NodeKind::Activity)
            }
            Role::Agent | Role::Delegate | Role::Responsible => ElementKind::Node(NodeKind::Agent),
            Role::Generation => ElementKind::Relation(RelationKind::Generation),
            Role::Usage => ElementKind::Relation(RelationKind::Usage),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    kind: RelationKind,
    id: Option<QualifiedName>,
    endpoints: Vec<(Role, QualifiedName)>,
    time: Option<DateTime<Utc>>,
    attributes: Attributes,
}

impl Relation {
    pub(crate) fn new(
        kind: RelationKind,
        id: Option<QualifiedName>,
        mut endpoints: Vec<(Role, QualifiedName)>,
        time: Option<DateTime<Utc>>,
        attributes: Attributes,
    ) -> Self {
        endpoints.sort_by_key(|(role, _)| kind.position(*role));
        Self { kind, id, endpoints, time, attributes }
    }

    pub fn kind(&self) -> RelationKind {
        self.kind
    }

    pub fn id(&self) -> Option<&QualifiedName> {
        self.id.as_ref()
    }

    pub(crate) fn assign_id(&mut self, id: QualifiedName) {
        self.id = Some(id);
    }

    pub fn endpoint(&self, role: Role) -> Option<&QualifiedName> {
        self.endpoints.iter().find(|(r, _)| *r == role).map(|(_, id)| id)
    }

    /// Endpoints in signature order, required roles first.
    pub fn endpoints(&self) -> impl Iterator<Item = (Role, &QualifiedName)> {
        self.endpoints.iter().map(|(role, id)| (*role, id))
    }

    pub fn time(&self) -> Option<DateTime<Utc>> {
        self.time
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn element_ref(&self) -> Option<ElementRef> {
        self.id
            .as_ref()
            .map(|id| ElementRef::new(ElementKind::Relation(self.kind), id.clone()))
    }

    /// Start a relation of `kind` from its required endpoints, in signature order.
    pub fn builder(kind: RelationKind, endpoints: Vec<ElementRef>) -> Result<RelationBuilder> {
        let required = kind.required_roles();
        if endpoints.len() != required.len() {
            return Err(ProvError::InvalidRelationSignature {
                relation: kind.section().to_string(),
                role: required.iter().map(Role::key).collect::<Vec<_>>().join(","),
                expected: format!("{} endpoints", required.len()),
                actual: format!("{} endpoints", endpoints.len()),
            });
        }
        let mut builder = RelationBuilder::new(kind);
        for (role, target) in required.iter().zip(endpoints) {
            builder = builder.with(*role, target)?;
        }
        Ok(builder)
    }

    pub fn was_generated_by(
        entity: impl Into<ElementRef>,
        activity: impl Into<ElementRef>,
    ) -> Result<RelationBuilder> {
        Self::builder(RelationKind::Generation, vec![entity.into(), activity.into()])
    }

    pub fn used(
        activity: impl Into<ElementRef>,
        entity: impl Into<ElementRef>,
    ) -> Result<RelationBuilder> {
        Self::builder(RelationKind::Usage, vec![activity.into(), entity.into()])
    }

    pub fn was_informed_by(
        informed: impl Into<ElementRef>,
        informant: impl Into<ElementRef>,
    ) -> Result<RelationBuilder> {
        Self::builder(RelationKind::Communication, vec![informed.into(), informant.into()])
    }

    pub fn was_started_by(
        activity: impl Into<ElementRef>,
        trigger: impl Into<ElementRef>,
    ) -> Result<RelationBuilder> {
        Self::builder(RelationKind::Start, vec![activity.into(), trigger.into()])
    }

    pub fn was_ended_by(
        activity: impl Into<ElementRef>,
        trigger: impl Into<ElementRef>,
    ) -> Result<RelationBuilder> {
        Self::builder(RelationKind::End, vec![activity.into(), trigger.into()])
    }

    pub fn was_invalidated_by(
        entity: impl Into<ElementRef>,
        activity: impl Into<ElementRef>,
    ) -> Result<RelationBuilder> {
        Self::builder(RelationKind::Invalidation, vec![entity.into(), activity.into()])
    }

    pub fn was_derived_from(
        generated_entity: impl Into<ElementRef>,
        used_entity: impl Into<ElementRef>,
    ) -> Result<RelationBuilder> {
        Self::builder(
            RelationKind::Derivation,
            vec![generated_entity.into(), used_entity.into()],
        )
    }

    pub fn was_attributed_to(
        entity: impl Into<ElementRef>,
        agent: impl Into<ElementRef>,
    ) -> Result<RelationBuilder> {
        Self::builder(RelationKind::Attribution, vec![entity.into(), agent.into()])
    }

    pub fn was_associated_with(
        activity: impl Into<ElementRef>,
        agent: impl Into<ElementRef>,
    ) -> Result<RelationBuilder> {
        Self::builder(RelationKind::Association, vec![activity.into(), agent.into()])
    }

    pub fn acted_on_behalf_of(
        delegate: impl Into<ElementRef>,
        responsible: impl Into<ElementRef>,
    ) -> Result<RelationBuilder> {
        Self::builder(RelationKind::Delegation, vec![delegate.into(), responsible.into()])
    }

    pub fn specialization_of(
        specific_entity: impl Into<ElementRef>,
        general_entity: impl Into<ElementRef>,
    ) -> Result<RelationBuilder> {
        Self::builder(
            RelationKind::Specialization,
            vec![specific_entity.into(), general_entity.into()],
        )
    }

    pub fn alternate_of(
        alternate1: impl Into<ElementRef>,
        alternate2: impl Into<ElementRef>,
    ) -> Result<RelationBuilder> {
        Self::builder(RelationKind::Alternate, vec![alternate1.into(), alternate2.into()])
    }
}
