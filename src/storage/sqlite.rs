//! SQLite storage implementation

use std::path::Path;
use rusqlite::{Connection, params, OptionalExtension};
use crate::Result;
use crate::row::{Configuration, NewConfiguration};
use super::schema;

const SELECT_CONFIGURATION: &str = "SELECT id, connection, name, description, config, type, infra_type, port_channel_id, max_frame_size FROM configurations";

/// Case-sensitive prefix match for port-channel rows (SQLite LIKE ignores case)
pub const PORT_CHANNEL_GLOB: &str = "Port-channel*";

/// Case-insensitive match for every Ethernet flavour (GigabitEthernet, TenGigabitEthernet, ...)
pub const ETHERNET_LIKE: &str = "%thernet%";

/// SQLite-backed storage for interface configurations
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Close the connection, reporting any error SQLite raises on close
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| e.into())
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<()> {
        for stmt in schema::all_schema_statements() {
            self.conn.execute(stmt, [])?;
        }
        Ok(())
    }

    // ========== Insert ==========

    /// Insert all rows in one transaction with a single prepared statement.
    ///
    /// Either every row is stored or none is. Returns the number of rows inserted.
    pub fn insert_configurations(&mut self, rows: &[NewConfiguration]) -> Result<usize> {
        if rows.is_empty() {
            return Ok(0);
        }

        let tx = self.conn.transaction()?;
        Self::insert_rows(&tx, rows)?;
        tx.commit()?;
        Ok(rows.len())
    }

    /// Delete every stored configuration and insert `rows` in the same transaction.
    ///
    /// A failed insert rolls the delete back with it. Returns `(deleted, inserted)`.
    pub fn replace_configurations(&mut self, rows: &[NewConfiguration]) -> Result<(usize, usize)> {
        let tx = self.conn.transaction()?;
        let deleted = tx.execute("DELETE FROM configurations", [])?;
        Self::insert_rows(&tx, rows)?;
        tx.commit()?;
        Ok((deleted, rows.len()))
    }

    fn insert_rows(tx: &rusqlite::Transaction<'_>, rows: &[NewConfiguration]) -> Result<()> {
        let mut stmt = tx.prepare(
            r#"
            INSERT INTO configurations (name, description, config, max_frame_size)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )?;

        for row in rows {
            stmt.execute(params![
                row.name,
                row.description,
                row.config.to_string(),
                row.max_frame_size,
            ])?;
        }
        Ok(())
    }

    // ========== Queries ==========

    /// Get a configuration by id
    pub fn get_configuration(&self, id: i64) -> Result<Option<Configuration>> {
        self.conn
            .query_row(
                &format!("{} WHERE id = ?1", SELECT_CONFIGURATION),
                [id],
                |row| self.row_to_configuration(row),
            )
            .optional()
            .map_err(Into::into)
    }

    /// All configurations in insertion order
    pub fn all_configurations(&self) -> Result<Vec<Configuration>> {
        self.query_configurations(&format!("{} ORDER BY id", SELECT_CONFIGURATION), [])
    }

    /// Configurations whose name starts with `Port-channel` (case-sensitive)
    pub fn find_port_channels(&self) -> Result<Vec<Configuration>> {
        self.query_configurations(
            &format!("{} WHERE name GLOB ?1 ORDER BY id", SELECT_CONFIGURATION),
            [PORT_CHANNEL_GLOB],
        )
    }

    /// Configurations whose name contains `thernet` (case-insensitive)
    pub fn find_ethernets(&self) -> Result<Vec<Configuration>> {
        self.query_configurations(
            &format!("{} WHERE name LIKE ?1 ORDER BY id", SELECT_CONFIGURATION),
            [ETHERNET_LIKE],
        )
    }

    fn query_configurations<P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<Vec<Configuration>> {
        let mut stmt = self.conn.prepare(sql)?;

        let rows = stmt
            .query_map(params, |row| self.row_to_configuration(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
    }

    /// Helper to convert a row to a Configuration
    fn row_to_configuration(&self, row: &rusqlite::Row) -> rusqlite::Result<Configuration> {
        let config_str: Option<String> = row.get(4)?;

        let config = match config_str {
            Some(text) => serde_json::from_str(&text).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
            })?,
            None => serde_json::Value::Null,
        };

        Ok(Configuration {
            id: row.get(0)?,
            connection: row.get(1)?,
            name: row.get(2)?,
            description: row.get(3)?,
            config,
            kind: row.get(5)?,
            infra_type: row.get(6)?,
            port_channel_id: row.get(7)?,
            max_frame_size: row.get(8)?,
        })
    }

    // ========== Updates ==========

    /// Apply `(port_channel_id, id)` pairs in one transaction
    pub fn update_port_channel_ids(&mut self, updates: &[(i64, i64)]) -> Result<usize> {
        if updates.is_empty() {
            return Ok(0);
        }

        let tx = self.conn.transaction()?;
        let mut updated = 0;

        {
            let mut stmt = tx.prepare("UPDATE configurations SET port_channel_id = ?1 WHERE id = ?2")?;
            for (port_channel_id, id) in updates {
                updated += stmt.execute(params![port_channel_id, id])?;
            }
        }

        tx.commit()?;
        Ok(updated)
    }

    // ========== Statistics ==========

    /// Count all configurations
    pub fn count_configurations(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM configurations", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Count configurations already linked to a port-channel
    pub fn count_linked(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM configurations WHERE port_channel_id IS NOT NULL",
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<DbStats> {
        Ok(DbStats {
            configurations: self.count_configurations()?,
            port_channels: self.find_port_channels()?.len(),
            ethernets: self.find_ethernets()?.len(),
            linked: self.count_linked()?,
        })
    }
}

/// Ensure the configurations table exists in the database at `path`.
///
/// Failures are logged and swallowed; the load that follows reports its own
/// storage errors.
pub fn provision_schema(path: &Path) {
    match SqliteStore::open(path).and_then(SqliteStore::close) {
        Ok(()) => tracing::debug!("Schema ready in {}", path.display()),
        Err(e) => tracing::error!("Failed to provision schema in {}: {}", path.display(), e),
    }
}

/// Database statistics
#[derive(Debug, Clone)]
pub struct DbStats {
    pub configurations: usize,
    pub port_channels: usize,
    pub ethernets: usize,
    pub linked: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(name: &str, config: serde_json::Value) -> NewConfiguration {
        NewConfiguration {
            name: name.to_string(),
            description: None,
            config,
            max_frame_size: None,
        }
    }

    #[test]
    fn test_insert_and_read_back() {
        let mut store = SqliteStore::open_in_memory().unwrap();

        let config = json!({
            "name": "1/0/1",
            "mtu": 1500,
            "nested": {"z": 1, "a": [1, 2, {"b": null}]}
        });
        let mut new_row = row("GigabitEthernet1/0/1", config.clone());
        new_row.description = Some("uplink".to_string());
        new_row.max_frame_size = Some(1500);

        assert_eq!(store.insert_configurations(&[new_row]).unwrap(), 1);

        let stored = store.all_configurations().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].name, "GigabitEthernet1/0/1");
        assert_eq!(stored[0].description.as_deref(), Some("uplink"));
        assert_eq!(stored[0].max_frame_size, Some(1500));
        assert_eq!(stored[0].config, config);
        assert_eq!(stored[0].port_channel_id, None);
        assert_eq!(stored[0].connection, None);
        assert_eq!(stored[0].kind, None);

        let by_id = store.get_configuration(stored[0].id).unwrap().unwrap();
        assert_eq!(by_id, stored[0]);
    }

    #[test]
    fn test_empty_insert_is_a_no_op() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.insert_configurations(&[]).unwrap(), 0);
        assert_eq!(store.count_configurations().unwrap(), 0);
    }

    #[test]
    fn test_duplicate_names_are_kept() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let rows = vec![row("Vlan1", json!({"name": 1})), row("Vlan1", json!({"name": 1}))];
        store.insert_configurations(&rows).unwrap();
        assert_eq!(store.count_configurations().unwrap(), 2);
    }

    #[test]
    fn test_port_channel_match_is_case_sensitive() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let rows = vec![
            row("Port-channel1", json!({"name": 1})),
            row("port-channel2", json!({"name": 2})),
            row("Port-channel-subinterface1.10", json!({"name": "1.10"})),
        ];
        store.insert_configurations(&rows).unwrap();

        let names: Vec<String> = store.find_port_channels().unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Port-channel1", "Port-channel-subinterface1.10"]);
    }

    #[test]
    fn test_ethernet_match_is_case_insensitive() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let rows = vec![
            row("GigabitEthernet1/0/1", json!({"name": "1/0/1"})),
            row("TENGIGABITETHERNET1/1/1", json!({"name": "1/1/1"})),
            row("Port-channel1", json!({"name": 1})),
        ];
        store.insert_configurations(&rows).unwrap();

        assert_eq!(store.find_ethernets().unwrap().len(), 2);
    }

    #[test]
    fn test_update_port_channel_ids() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store
            .insert_configurations(&[
                row("Port-channel1", json!({"name": 1})),
                row("GigabitEthernet1/0/1", json!({"name": "1/0/1"})),
            ])
            .unwrap();

        let pc = store.find_port_channels().unwrap()[0].id;
        let eth = store.find_ethernets().unwrap()[0].id;

        assert_eq!(store.update_port_channel_ids(&[(pc, eth)]).unwrap(), 1);
        assert_eq!(store.get_configuration(eth).unwrap().unwrap().port_channel_id, Some(pc));
        assert_eq!(store.count_linked().unwrap(), 1);
    }

    #[test]
    fn test_stats() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store
            .insert_configurations(&[
                row("Port-channel1", json!({"name": 1})),
                row("GigabitEthernet1/0/1", json!({"name": "1/0/1"})),
                row("Loopback0", json!({"name": 0})),
            ])
            .unwrap();

        let stats = store.stats().unwrap();
        assert_eq!(stats.configurations, 3);
        assert_eq!(stats.port_channels, 1);
        assert_eq!(stats.ethernets, 1);
        assert_eq!(stats.linked, 0);
    }

    #[test]
    fn test_replace_configurations() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store
            .insert_configurations(&[row("Vlan1", json!({"name": 1})), row("Vlan2", json!({"name": 2}))])
            .unwrap();

        let (deleted, inserted) = store
            .replace_configurations(&[row("Loopback0", json!({"name": 0}))])
            .unwrap();
        assert_eq!((deleted, inserted), (2, 1));

        let names: Vec<String> = store.all_configurations().unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Loopback0"]);
    }

    #[test]
    fn test_failed_replace_keeps_previous_rows() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store
            .insert_configurations(&[row("Vlan1", json!({"name": 1})), row("Vlan2", json!({"name": 2}))])
            .unwrap();
        store
            .conn
            .execute_batch(
                "CREATE TRIGGER reject_loopback BEFORE INSERT ON configurations
                 WHEN NEW.name GLOB 'Loopback*'
                 BEGIN SELECT RAISE(ABORT, 'loopback rejected'); END;",
            )
            .unwrap();

        let result = store.replace_configurations(&[
            row("Port-channel1", json!({"name": 1})),
            row("Loopback0", json!({"name": 0})),
        ]);
        assert!(matches!(result, Err(crate::Error::Storage(_))));

        let names: Vec<String> = store.all_configurations().unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Vlan1", "Vlan2"]);
    }
}
