//! Syntactic validation of collector configuration payloads.
//!
//! Only the outer shape is checked: a YAML mapping whose `modules` key, if
//! present and not null, maps module names to mappings. Module contents
//! belong to the collector. A document with no content at all is an empty
//! configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Body written when the configuration is reset.
pub const RESET_BODY: &str = "modules: {}\n";

/// Why a payload was rejected.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("{0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Outer shape of the collector configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CollectorDocument {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub modules: BTreeMap<String, serde_yaml::Mapping>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<BTreeMap<String, serde_yaml::Mapping>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::deserialize(deserializer)?.unwrap_or_default())
}

impl CollectorDocument {
    pub fn module_names(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }
}

/// Parse `text` as a collector configuration.
pub fn parse(text: &str) -> Result<CollectorDocument, DocumentError> {
    match serde_yaml::from_str::<Option<CollectorDocument>>(text) {
        Ok(doc) => Ok(doc.unwrap_or_default()),
        // No document in the stream at all, e.g. only whitespace or comments.
        Err(_) if !has_content(text) => Ok(CollectorDocument::default()),
        Err(e) => Err(e.into()),
    }
}

fn has_content(text: &str) -> bool {
    text.lines()
        .map(str::trim)
        .any(|line| !line.is_empty() && !line.starts_with('#') && line != "---" && line != "...")
}
