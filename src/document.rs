//! Configuration document loading
//!
//! A device configuration is a hierarchical document. The interfaces mapping
//! sits at a fixed path of nested keys, described by [`SchemaPath`] so that a
//! changed input layout only means editing one declared path.

use std::fmt;
use std::path::Path;
use serde_json::{Map, Value};
use crate::{Error, Result};

/// Key path to the interfaces mapping in a UniConfig IOS-XE export
pub const DEFAULT_SCHEMA_PATH: &[&str] = &[
    "frinx-uniconfig-topology:configuration",
    "Cisco-IOS-XE-native:native",
    "interface",
];

/// Ordered list of keys leading from the document root to the interfaces mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaPath {
    keys: Vec<String>,
}

impl SchemaPath {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }
}

impl Default for SchemaPath {
    fn default() -> Self {
        Self::new(DEFAULT_SCHEMA_PATH.iter().copied())
    }
}

impl fmt::Display for SchemaPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keys.join("/"))
    }
}

/// Input format of a configuration document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// `.json` files use the JSON parser, everything else goes through YAML,
    /// which also accepts JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|s| s.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => DocumentFormat::Json,
            _ => DocumentFormat::Yaml,
        }
    }
}

/// Parsed configuration document. Mapping order follows the source file.
#[derive(Debug, Clone)]
pub struct ConfigDocument {
    root: Value,
}

impl ConfigDocument {
    /// Read and parse a document from disk
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let format = DocumentFormat::from_path(path);
        tracing::debug!("Parsing {} as {:?}", path.display(), format);
        Self::parse(&contents, format)
    }

    /// Parse a document from a string
    pub fn parse(contents: &str, format: DocumentFormat) -> Result<Self> {
        let root = match format {
            DocumentFormat::Json => serde_json::from_str(contents)?,
            DocumentFormat::Yaml => {
                serde_yaml::from_str(contents).map_err(|e| Error::Parse(e.to_string()))?
            }
        };
        Ok(Self { root })
    }

    pub fn from_value(root: Value) -> Self {
        Self { root }
    }

    /// Walk `path` down to the interfaces mapping.
    ///
    /// Fails with [`Error::MissingKey`] on the first key that is absent.
    pub fn interfaces(&self, path: &SchemaPath) -> Result<&Map<String, Value>> {
        let mut current = &self.root;
        let mut walked: Vec<&str> = Vec::new();

        for key in path.keys() {
            match current.as_object().and_then(|map| map.get(key)) {
                Some(next) => {
                    current = next;
                    walked.push(key);
                }
                None => {
                    return Err(Error::MissingKey {
                        key: key.clone(),
                        path: if walked.is_empty() {
                            "<root>".to_string()
                        } else {
                            walked.join("/")
                        },
                    });
                }
            }
        }

        current
            .as_object()
            .ok_or_else(|| Error::MalformedDocument(format!("'{}' is not a mapping", path)))
    }
}

/// String form of a scalar record value: strings verbatim, numbers and
/// booleans via their display form, anything else as compact JSON.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}
