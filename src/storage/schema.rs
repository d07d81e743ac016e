//! Database schema definitions

/// SQL to create the configurations table.
///
/// Column casing of `PORT_channel_id` and `max_Frame_size` follows the
/// upstream table definition. SQLite identifiers are case-insensitive, so
/// queries address them in lower case.
pub const CREATE_CONFIGURATIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS configurations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    connection INTEGER,
    name VARCHAR(255) NOT NULL,
    description VARCHAR(255),
    config TEXT,
    type VARCHAR(50),
    infra_type VARCHAR(50),
    PORT_channel_id INTEGER,
    max_Frame_size INTEGER
)
"#;

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_configurations_name ON configurations(name)",
];

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![CREATE_CONFIGURATIONS_TABLE];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}
