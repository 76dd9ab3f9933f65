use crate::namespace::QualifiedName;
use crate::vocabulary::{namespaces, xsd};
use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;

/// A value tagged with an explicit datatype and optional language.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProvLiteral {
    value: String,
    datatype: QualifiedName,
    language: Option<String>,
}

impl ProvLiteral {
    pub fn new(value: impl Into<String>, datatype: QualifiedName, language: Option<&str>) -> Self {
        Self { value: value.into(), datatype, language: language.map(str::to_string) }
    }

    pub fn typed(value: impl Into<String>, datatype: QualifiedName) -> Self {
        Self::new(value, datatype, None)
    }

    pub fn lang_string(value: impl Into<String>, language: &str) -> Self {
        Self::new(value, xsd_name(xsd::STRING), Some(language))
    }

    pub fn date_time(time: DateTime<Utc>) -> Self {
        Self::typed(format_time(&time), xsd_name(xsd::DATE_TIME))
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn datatype(&self) -> &QualifiedName {
        &self.datatype
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }
}

impl fmt::Display for ProvLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"^^{}", self.value, self.datatype)?;
        if let Some(lang) = &self.language {
            write!(f, "@{}", lang)?;
        }
        Ok(())
    }
}

pub(crate) fn xsd_name(local: &str) -> QualifiedName {
    QualifiedName::new(Some(namespaces::XSD_PREFIX), namespaces::XSD, local)
}

pub(crate) fn format_time(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}
