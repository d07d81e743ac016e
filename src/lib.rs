//! # ifconf - Network Interface Configuration Loader
//!
//! Loads interface definitions from a device configuration document into a
//! relational `configurations` table.
//!
//! ifconf provides:
//! - Document loading (JSON or YAML) with an explicit schema path to the interfaces mapping
//! - Lazy record extraction with case-insensitive interface name filtering
//! - Row projection into flat columns, keeping the original record as JSON
//! - SQLite-backed storage with batched inserts
//! - Port-channel cross-reference resolution for Ethernet members

pub mod document;
pub mod extract;
pub mod row;
pub mod storage;
pub mod resolve;
pub mod pipeline;
pub mod ui;
pub mod config;

// Re-exports for convenient access
pub use document::{ConfigDocument, SchemaPath};
pub use extract::{InterfaceFilter, InterfaceRecord, RecordExtractor};
pub use row::{Configuration, NewConfiguration};
pub use storage::SqliteStore;
pub use resolve::{CrossReferenceResolver, ResolveStats};
pub use pipeline::{InterfaceConfigurationPipeline, PipelineReport};

/// Result type alias for ifconf operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for ifconf operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Missing key '{key}' under '{path}'")]
    MissingKey { key: String, path: String },

    #[error("Record of '{interface}' has no '{field}' field")]
    MissingField { interface: String, field: String },

    #[error("Invalid '{field}' value in '{interface}': {value}")]
    InvalidField {
        interface: String,
        field: String,
        value: String,
    },

    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    #[error("Interface '{interface}' references unknown port-channel {number}")]
    UnresolvedChannelGroup { interface: String, number: String },
}

impl Error {
    /// Storage failures halt the run after releasing the connection.
    /// Everything else is a data-shape error and propagates as-is.
    pub fn is_storage(&self) -> bool {
        matches!(self, Error::Storage(_))
    }
}
