//! Provenance vocabulary constants.
//!
//! Namespace URIs, reserved attribute keys and document section names used
//! when rendering and parsing PROV-JSON documents.

// Well-known namespaces bound in every container's global scope
pub mod namespaces {
    pub const PROV_PREFIX: &str = "prov";
    pub const PROV: &str = "http://www.w3.org/ns/prov#";
    pub const XSD_PREFIX: &str = "xsd";
    pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";
    pub const BLANK_PREFIX: &str = "_";
    pub const BLANK: &str = "urn:provdm:blank:";
    // Key of the default namespace inside a `prefix` section.
    pub const DEFAULT_KEY: &str = "default";
}

// XML Schema datatypes
pub mod xsd {
    pub const STRING: &str = "string";
    pub const DATE_TIME: &str = "dateTime";
    pub const BOOLEAN: &str = "boolean";
    pub const LONG: &str = "long";
    pub const DOUBLE: &str = "double";
}

// Reserved attribute keys rendered without a prefix
pub mod keys {
    pub const TYPE: &str = "type";
    pub const START_TIME: &str = "startTime";
    pub const END_TIME: &str = "endTime";
    pub const TIME: &str = "time";
    pub const ASSERTER: &str = "asserter";
    pub const PREFIX: &str = "prefix";
}

// Keys of a rendered typed literal
pub mod literal {
    pub const VALUE: &str = "value";
    pub const TYPE: &str = "type";
    pub const LANG: &str = "lang";
}

// Relation endpoint roles
pub mod roles {
    pub const ENTITY: &str = "entity";
    pub const ACTIVITY: &str = "activity";
    pub const AGENT: &str = "agent";
    pub const GENERATED_ENTITY: &str = "generatedEntity";
    pub const USED_ENTITY: &str = "usedEntity";
    pub const GENERATION: &str = "generation";
    pub const USAGE: &str = "usage";
    pub const INFORMED: &str = "informed";
    pub const INFORMANT: &str = "informant";
    pub const TRIGGER: &str = "trigger";
    pub const PLAN: &str = "plan";
    pub const DELEGATE: &str = "delegate";
    pub const RESPONSIBLE: &str = "responsible";
    pub const SPECIFIC_ENTITY: &str = "specificEntity";
    pub const GENERAL_ENTITY: &str = "generalEntity";
    pub const ALTERNATE_1: &str = "alternate1";
    pub const ALTERNATE_2: &str = "alternate2";
}

// Document sections
pub mod sections {
    pub const PREFIX: &str = "prefix";
    pub const ENTITY: &str = "entity";
    pub const ACTIVITY: &str = "activity";
    pub const AGENT: &str = "agent";
    pub const ACCOUNT: &str = "account";
    pub const WAS_GENERATED_BY: &str = "wasGeneratedBy";
    pub const USED: &str = "used";
    pub const WAS_INFORMED_BY: &str = "wasInformedBy";
    pub const WAS_STARTED_BY: &str = "wasStartedBy";
    pub const WAS_ENDED_BY: &str = "wasEndedBy";
    pub const WAS_INVALIDATED_BY: &str = "wasInvalidatedBy";
    pub const WAS_DERIVED_FROM: &str = "wasDerivedFrom";
    pub const WAS_ATTRIBUTED_TO: &str = "wasAttributedTo";
    pub const WAS_ASSOCIATED_WITH: &str = "wasAssociatedWith";
    pub const ACTED_ON_BEHALF_OF: &str = "actedOnBehalfOf";
    pub const SPECIALIZATION_OF: &str = "specializationOf";
    pub const ALTERNATE_OF: &str = "alternateOf";
}

/// Keys that are always rendered bare, so a default-namespace name with the
/// same local part must keep its prefix.
pub fn is_reserved_key(key: &str) -> bool {
    matches!(
        key,
        keys::TYPE
            | keys::START_TIME
            | keys::END_TIME
            | keys::TIME
            | keys::ASSERTER
            | keys::PREFIX
            | roles::ENTITY
            | roles::ACTIVITY
            | roles::AGENT
            | roles::GENERATED_ENTITY
            | roles::USED_ENTITY
            | roles::GENERATION
            | roles::USAGE
            | roles::INFORMED
            | roles::INFORMANT
            | roles::TRIGGER
            | roles::PLAN
            | roles::DELEGATE
            | roles::RESPONSIBLE
            | roles::SPECIFIC_ENTITY
            | roles::GENERAL_ENTITY
            | roles::ALTERNATE_1
            | roles::ALTERNATE_2
    ) || is_section_name(key)
}

fn is_section_name(key: &str) -> bool {
    matches!(
        key,
        sections::ENTITY
            | sections::ACTIVITY
            | sections::AGENT
            | sections::ACCOUNT
            | sections::WAS_GENERATED_BY
            | sections::USED
            | sections::WAS_INFORMED_BY
            | sections::WAS_STARTED_BY
            | sections::WAS_ENDED_BY
            | sections::WAS_INVALIDATED_BY
            | sections::WAS_DERIVED_FROM
            | sections::WAS_ATTRIBUTED_TO
            | sections::WAS_ASSOCIATED_WITH
            | sections::ACTED_ON_BEHALF_OF
            | sections::SPECIALIZATION_OF
            | sections::ALTERNATE_OF
    )
}
