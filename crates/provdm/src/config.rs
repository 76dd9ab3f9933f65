use crate::vocabulary::namespaces;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// Namespace URI for ids synthesized for anonymous relations.
    pub blank_namespace: String,
    /// Pre-bind `prov`, `xsd` and `_` in the global scope.
    pub well_known_namespaces: bool,
}

impl ContainerConfig {
    pub fn new(blank_namespace: impl Into<String>) -> Self {
        Self { blank_namespace: blank_namespace.into(), ..Self::default() }
    }

    pub fn without_well_known_namespaces(mut self) -> Self {
        self.well_known_namespaces = false;
        self
    }
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self { blank_namespace: namespaces::BLANK.to_string(), well_known_namespaces: true }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializerConfig {
    /// Indent the encoded document.
    pub pretty: bool,
}

impl SerializerConfig {
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}
