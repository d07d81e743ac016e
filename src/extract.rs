//! Record extraction
//!
//! Walks the interfaces mapping and yields one [`InterfaceRecord`] per
//! configuration record, in document order. Interfaces can be narrowed with
//! an [`InterfaceFilter`].

use serde_json::{Map, Value};
use crate::document::{ConfigDocument, SchemaPath};
use crate::{Error, Result};

/// Case-insensitive substring filter on interface names.
/// An empty filter accepts every interface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterfaceFilter {
    terms: Vec<String>,
}

impl InterfaceFilter {
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            terms: terms
                .into_iter()
                .map(|t| t.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Filter that accepts everything
    pub fn all() -> Self {
        Self::default()
    }

    pub fn matches(&self, interface: &str) -> bool {
        if self.terms.is_empty() {
            return true;
        }
        let interface = interface.to_lowercase();
        self.terms.iter().any(|term| interface.contains(term.as_str()))
    }
}

/// One configuration record together with the interface key it was listed under
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterfaceRecord<'a> {
    pub interface: &'a str,
    pub record: &'a Value,
}

/// Lazy iterator over (interface, record) pairs
pub struct RecordExtractor<'a> {
    interfaces: serde_json::map::Iter<'a>,
    filter: &'a InterfaceFilter,
    current: Option<(&'a str, std::slice::Iter<'a, Value>)>,
}

impl<'a> RecordExtractor<'a> {
    pub fn new(interfaces: &'a Map<String, Value>, filter: &'a InterfaceFilter) -> Self {
        Self {
            interfaces: interfaces.iter(),
            filter,
            current: None,
        }
    }

    /// Resolve the interfaces mapping of `document` and iterate over it
    pub fn from_document(
        document: &'a ConfigDocument,
        path: &SchemaPath,
        filter: &'a InterfaceFilter,
    ) -> Result<Self> {
        let interfaces = document.interfaces(path)?;
        Ok(Self::new(interfaces, filter))
    }
}

impl<'a> Iterator for RecordExtractor<'a> {
    type Item = Result<InterfaceRecord<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((interface, records)) = self.current.as_mut() {
                if let Some(record) = records.next() {
                    return Some(Ok(InterfaceRecord {
                        interface: *interface,
                        record,
                    }));
                }
            }
            self.current = None;

            let (interface, value) = self.interfaces.next()?;
            if !self.filter.matches(interface) {
                tracing::trace!("Skipping interface {}", interface);
                continue;
            }

            match value.as_array() {
                Some(records) => self.current = Some((interface.as_str(), records.iter())),
                None => {
                    return Some(Err(Error::MalformedDocument(format!(
                        "interface '{}' is not a list of records",
                        interface
                    ))));
                }
            }
        }
    }
}
