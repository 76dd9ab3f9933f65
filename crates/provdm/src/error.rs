use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProvError {
    #[error("namespace conflict: prefix '{prefix}' is bound to {existing}, cannot rebind to {requested}")]
    NamespaceConflict { prefix: String, existing: String, requested: String },
    #[error("unresolved prefix '{prefix}' in name '{name}'")]
    UnresolvedPrefix { prefix: String, name: String },
    #[error("duplicate identifier {id}")]
    DuplicateIdentifier { id: String },
    #[error("unknown node {id}")]
    UnknownNode { id: String },
    #[error("invalid relation signature for {relation}: role '{role}' expects {expected}, got {actual}")]
    InvalidRelationSignature {
        relation: String,
        role: String,
        expected: String,
        actual: String,
    },
    #[error("invalid time range for activity {id}: end precedes start")]
    InvalidTimeRange { id: String },
    #[error("malformed provenance document: {reason}")]
    MalformedDocument { reason: String },
    #[error("provenance document encoding error")]
    Json(#[from] serde_json::Error),
}

impl ProvError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        ProvError::MalformedDocument { reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, ProvError>;
