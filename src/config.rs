use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::document::{SchemaPath, DEFAULT_SCHEMA_PATH};
use crate::resolve::DEFAULT_CHANNEL_GROUP_KEY;

/// Settings read from `ifconf.toml`. Every field is optional; CLI flags win.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct IfconfConfig {
    pub database: Option<String>,
    pub file: Option<String>,
    pub interfaces: Option<Vec<String>>,
    pub schema_path: Option<Vec<String>>,
    pub channel_group_key: Option<String>,
}

impl IfconfConfig {
    /// Starter settings written by `ifconf init`
    pub fn starter() -> Self {
        Self {
            database: Some(default_database_path_in(Path::new(".")).display().to_string()),
            file: None,
            interfaces: Some(vec!["ethernet".to_string(), "port-channel".to_string()]),
            schema_path: Some(DEFAULT_SCHEMA_PATH.iter().map(|s| s.to_string()).collect()),
            channel_group_key: Some(DEFAULT_CHANNEL_GROUP_KEY.to_string()),
        }
    }

    pub fn schema_path(&self) -> SchemaPath {
        self.schema_path
            .as_ref()
            .map(|keys| SchemaPath::new(keys.iter().cloned()))
            .unwrap_or_default()
    }

    pub fn channel_group_key(&self) -> &str {
        self.channel_group_key.as_deref().unwrap_or(DEFAULT_CHANNEL_GROUP_KEY)
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("ifconf.toml")
}

pub fn default_database_path_in(base: &Path) -> PathBuf {
    base.join(".ifconf").join("ifconf.db")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<IfconfConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: IfconfConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &IfconfConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

pub fn ensure_db_dir(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_config(Some(&dir.path().join("ifconf.toml"))).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_write_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ifconf.toml");

        let config = IfconfConfig::starter();
        write_config(&path, &config, false).unwrap();
        assert!(write_config(&path, &config, false).is_err());
        write_config(&path, &config, true).unwrap();

        let loaded = load_config(Some(&path)).unwrap().unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.schema_path(), SchemaPath::default());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: IfconfConfig = toml::from_str(
            r#"
            database = "net.db"
            schema_path = ["data", "interfaces"]
            "#,
        )
        .unwrap();

        assert_eq!(config.database.as_deref(), Some("net.db"));
        assert_eq!(config.schema_path(), SchemaPath::new(["data", "interfaces"]));
        assert_eq!(config.channel_group_key(), DEFAULT_CHANNEL_GROUP_KEY);
        assert!(config.interfaces.is_none());
    }

    #[test]
    fn test_ensure_db_dir() {
        let dir = tempfile::tempdir().unwrap();
        let db = default_database_path_in(dir.path());
        ensure_db_dir(&db).unwrap();
        assert!(db.parent().unwrap().is_dir());
    }
}
