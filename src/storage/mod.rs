//! Storage Layer - SQLite-backed persistence
//!
//! System of record is SQLite with one table:
//! - configurations(id, connection, name, description, config, type, infra_type, port_channel_id, max_frame_size)

pub mod schema;
pub mod sqlite;

pub use sqlite::{SqliteStore, DbStats, provision_schema};
