//! Two-stage load pipeline
//!
//! Stage 1 (load): document → records → rows → batched insert.
//! Stage 2 (resolve): port-channel cross-references, read back from storage.
//!
//! The stages share nothing in memory; stage 2 only sees persisted ids, so it
//! can also be run on its own against an existing database.

use std::path::PathBuf;
use crate::document::{ConfigDocument, SchemaPath};
use crate::extract::{InterfaceFilter, RecordExtractor};
use crate::resolve::{CrossReferenceResolver, ResolveStats};
use crate::row::{project_all, NewConfiguration};
use crate::storage::SqliteStore;
use crate::Result;

/// Loads one configuration file into the store
pub struct InterfaceConfigurationPipeline {
    store: SqliteStore,
    file: PathBuf,
    filter: InterfaceFilter,
    schema_path: SchemaPath,
    resolver: CrossReferenceResolver,
    replace: bool,
    resolve: bool,
}

/// Outcome of a pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    pub inserted: usize,
    pub resolve: Option<ResolveStats>,
}

impl InterfaceConfigurationPipeline {
    pub fn new(store: SqliteStore, file: impl Into<PathBuf>, filter: InterfaceFilter) -> Self {
        Self {
            store,
            file: file.into(),
            filter,
            schema_path: SchemaPath::default(),
            resolver: CrossReferenceResolver::default(),
            replace: false,
            resolve: true,
        }
    }

    pub fn with_schema_path(mut self, schema_path: SchemaPath) -> Self {
        self.schema_path = schema_path;
        self
    }

    pub fn with_resolver(mut self, resolver: CrossReferenceResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Clear the table before inserting
    pub fn with_replace(mut self, replace: bool) -> Self {
        self.replace = replace;
        self
    }

    /// Run the resolve stage after loading (on by default)
    pub fn with_resolve(mut self, resolve: bool) -> Self {
        self.resolve = resolve;
        self
    }

    pub fn store(&self) -> &SqliteStore {
        &self.store
    }

    pub fn into_store(self) -> SqliteStore {
        self.store
    }

    /// Parse the document and project every matching record
    pub fn extract_rows(&self) -> Result<Vec<NewConfiguration>> {
        let document = ConfigDocument::load(&self.file)?;
        let records = RecordExtractor::from_document(&document, &self.schema_path, &self.filter)?;
        project_all(records)
    }

    /// Stage 1: extract and insert. Returns the number of rows inserted.
    pub fn load_stage(&mut self) -> Result<usize> {
        let rows = self.extract_rows()?;
        tracing::debug!("Projected {} rows from {}", rows.len(), self.file.display());

        if rows.is_empty() {
            tracing::debug!("No configurations to insert");
        }

        let inserted = if self.replace {
            let (deleted, inserted) = self
                .store
                .replace_configurations(&rows)
                .inspect_err(|e| tracing::error!("Failed to replace configurations: {}", e))?;
            tracing::info!("Removed {} existing configurations", deleted);
            inserted
        } else {
            self.store
                .insert_configurations(&rows)
                .inspect_err(|e| tracing::error!("Failed to insert configurations: {}", e))?
        };
        tracing::info!("Inserted {} configurations from {}", inserted, self.file.display());
        Ok(inserted)
    }

    /// Stage 2: resolve port-channel membership
    pub fn resolve_stage(&mut self) -> Result<ResolveStats> {
        self.resolver.resolve(&mut self.store).inspect_err(|e| {
            if e.is_storage() {
                tracing::error!("Failed to resolve port-channels: {}", e);
            }
        })
    }

    /// Run the enabled stages, keeping the store open
    pub fn execute(&mut self) -> Result<PipelineReport> {
        let inserted = self.load_stage()?;
        let resolve = if self.resolve {
            Some(self.resolve_stage()?)
        } else {
            None
        };
        Ok(PipelineReport { inserted, resolve })
    }

    /// Run to completion and close the connection.
    ///
    /// On failure the store is dropped with the pipeline, which also closes it.
    pub fn run(mut self) -> Result<PipelineReport> {
        let report = self.execute()?;
        self.store.close()?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_document(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_extract_rows_with_custom_schema_path() {
        let file = write_document(
            r#"{"interface": {"Loopback": [{"name": 0, "description": "router-id"}]}}"#,
        );
        let pipeline = InterfaceConfigurationPipeline::new(
            SqliteStore::open_in_memory().unwrap(),
            file.path(),
            InterfaceFilter::all(),
        )
        .with_schema_path(SchemaPath::new(["interface"]));

        let rows = pipeline.extract_rows().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Loopback0");
        assert_eq!(rows[0].description.as_deref(), Some("router-id"));
    }

    #[test]
    fn test_missing_schema_key_inserts_nothing() {
        let file = write_document(r#"{"native": {}}"#);
        let mut pipeline = InterfaceConfigurationPipeline::new(
            SqliteStore::open_in_memory().unwrap(),
            file.path(),
            InterfaceFilter::all(),
        );

        assert!(matches!(pipeline.execute(), Err(crate::Error::MissingKey { .. })));
        assert_eq!(pipeline.store().count_configurations().unwrap(), 0);
    }

    #[test]
    fn test_replace_clears_previous_load() {
        let file = write_document(r#"{"interface": {"Vlan": [{"name": 1}, {"name": 2}]}}"#);

        let mut pipeline = InterfaceConfigurationPipeline::new(
            SqliteStore::open_in_memory().unwrap(),
            file.path(),
            InterfaceFilter::all(),
        )
        .with_schema_path(SchemaPath::new(["interface"]));
        pipeline.execute().unwrap();
        pipeline.execute().unwrap();
        assert_eq!(pipeline.store().count_configurations().unwrap(), 4);

        let mut pipeline = InterfaceConfigurationPipeline::new(
            pipeline.into_store(),
            file.path(),
            InterfaceFilter::all(),
        )
        .with_schema_path(SchemaPath::new(["interface"]))
        .with_replace(true);
        pipeline.execute().unwrap();
        assert_eq!(pipeline.store().count_configurations().unwrap(), 2);
    }

    #[test]
    fn test_replace_with_bad_document_keeps_rows() {
        let good = write_document(r#"{"interface": {"Vlan": [{"name": 1}, {"name": 2}]}}"#);
        let bad = write_document(r#"{"interface": {"Vlan": [{"name": 3}, {"mtu": 1500}]}}"#);

        let mut pipeline = InterfaceConfigurationPipeline::new(
            SqliteStore::open_in_memory().unwrap(),
            good.path(),
            InterfaceFilter::all(),
        )
        .with_schema_path(SchemaPath::new(["interface"]));
        pipeline.execute().unwrap();

        let mut pipeline = InterfaceConfigurationPipeline::new(
            pipeline.into_store(),
            bad.path(),
            InterfaceFilter::all(),
        )
        .with_schema_path(SchemaPath::new(["interface"]))
        .with_replace(true);
        assert!(matches!(pipeline.execute(), Err(crate::Error::MissingField { .. })));
        assert_eq!(pipeline.store().count_configurations().unwrap(), 2);
    }

    #[test]
    fn test_skip_resolve() {
        let file = write_document(r#"{"interface": {"Vlan": [{"name": 1}]}}"#);
        let mut pipeline = InterfaceConfigurationPipeline::new(
            SqliteStore::open_in_memory().unwrap(),
            file.path(),
            InterfaceFilter::all(),
        )
        .with_schema_path(SchemaPath::new(["interface"]))
        .with_resolve(false);

        let report = pipeline.execute().unwrap();
        assert_eq!(report.inserted, 1);
        assert_eq!(report.resolve, None);
    }
}
