//! ifconf CLI - Load network interface configurations into SQLite

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use ifconf::config::{self, IfconfConfig};
use ifconf::storage::{provision_schema, SqliteStore};
use ifconf::ui::{self, Icons};
use ifconf::{CrossReferenceResolver, InterfaceConfigurationPipeline, InterfaceFilter};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "ifconf")]
#[command(version)]
#[command(about = "Load network interface configurations into a relational table")]
#[command(long_about = r#"
ifconf reads a device configuration document (JSON or YAML), extracts the
interface records, stores them in the `configurations` table and links
Ethernet members to their port-channels.

Example usage:
  ifconf init
  ifconf load --file configClear_v2.json --interface ethernet --interface port-channel
  ifconf list
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the settings file (defaults to ifconf.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter settings file and create the database schema
    Init {
        /// Overwrite an existing settings file
        #[arg(long)]
        force: bool,

        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,
    },

    /// Load a configuration document and resolve port-channel membership
    Load {
        /// Configuration document to load
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Only load interfaces whose name contains this term (repeatable, case-insensitive)
        #[arg(short, long = "interface")]
        interfaces: Vec<String>,

        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Delete existing configurations before loading
        #[arg(long)]
        replace: bool,

        /// Only insert rows, leave port-channel links for a later `resolve`
        #[arg(long)]
        skip_resolve: bool,
    },

    /// Resolve port-channel membership for rows already in the database
    Resolve {
        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,
    },

    /// List stored configurations
    List {
        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Print rows as JSON, including the stored record
        #[arg(long)]
        json: bool,
    },

    /// Show statistics about the stored configurations
    Stats {
        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,
    },
}

fn database_path(flag: Option<PathBuf>, settings: &IfconfConfig) -> PathBuf {
    flag.or_else(|| settings.database.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| config::default_database_path_in(Path::new(".")))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let settings = config::load_config(cli.config.as_deref())?.unwrap_or_default();

    match cli.command {
        Commands::Init { force, database } => {
            let config_path = cli.config.clone().unwrap_or_else(config::default_config_path);
            let mut starter = IfconfConfig::starter();
            if let Some(db) = &database {
                starter.database = Some(db.display().to_string());
            }

            config::write_config(&config_path, &starter, force)?;
            let db_path = database_path(database, &starter);
            config::ensure_db_dir(&db_path)?;
            provision_schema(&db_path);

            ui::success(&format!("Wrote {}", config_path.display()));
            ui::info(Icons::DATABASE, "Database", &db_path.display().to_string());
        }

        Commands::Load { file, interfaces, database, replace, skip_resolve } => {
            let file = file
                .or_else(|| settings.file.as_ref().map(PathBuf::from))
                .context("no input document; pass --file or set `file` in ifconf.toml")?;
            let terms = if interfaces.is_empty() {
                settings.interfaces.clone().unwrap_or_default()
            } else {
                interfaces
            };
            let db_path = database_path(database, &settings);

            ui::header("Loading interface configurations");
            ui::info(Icons::FILE, "File", &file.display().to_string());
            ui::info(Icons::DATABASE, "Database", &db_path.display().to_string());
            ui::info(
                Icons::FILTER,
                "Interfaces",
                &if terms.is_empty() { "all".to_string() } else { terms.join(", ") },
            );

            config::ensure_db_dir(&db_path)?;
            provision_schema(&db_path);

            let store = SqliteStore::open(&db_path)?;
            let pipeline = InterfaceConfigurationPipeline::new(store, &file, InterfaceFilter::new(&terms))
                .with_schema_path(settings.schema_path())
                .with_resolver(CrossReferenceResolver::new(settings.channel_group_key()))
                .with_replace(replace)
                .with_resolve(!skip_resolve);

            let report = pipeline
                .run()
                .with_context(|| format!("failed to load {}", file.display()))?;

            ui::phase("Load");
            ui::summary_row("Inserted:", &report.inserted.to_string());

            match report.resolve {
                Some(stats) => ui::resolve_summary(&stats),
                None => ui::summary_row("Cross-reference:", &ui::muted("skipped")),
            }

            ui::success("Load complete");
        }

        Commands::Resolve { database } => {
            let db_path = database_path(database, &settings);
            let mut store = SqliteStore::open(&db_path)?;

            ui::header("Resolving port-channel membership");
            ui::info(Icons::DATABASE, "Database", &db_path.display().to_string());
            let stats = CrossReferenceResolver::new(settings.channel_group_key())
                .resolve(&mut store)
                .context("port-channel resolution failed")?;
            store.close()?;

            ui::resolve_summary(&stats);
            ui::success("Resolve complete");
        }

        Commands::List { database, json } => {
            let db_path = database_path(database, &settings);
            let store = SqliteStore::open(&db_path)?;
            let configurations = store.all_configurations()?;

            if json {
                println!("{}", serde_json::to_string_pretty(&configurations)?);
            } else if configurations.is_empty() {
                ui::warn("No configurations stored.");
            } else {
                println!("{}", ui::configurations_table(&configurations));
            }
        }

        Commands::Stats { database } => {
            let db_path = database_path(database, &settings);
            let store = SqliteStore::open(&db_path)?;
            let stats = store.stats()?;
            let configurations = stats.configurations.to_string();
            let port_channels = stats.port_channels.to_string();
            let ethernets = stats.ethernets.to_string();
            let linked = stats.linked.to_string();

            ui::section(&format!("{} ifconf Statistics ({})", Icons::STATS, db_path.display()));
            println!(
                "{}",
                ui::stats_table(&[
                    ("Configurations", configurations.as_str()),
                    ("Port-channels", port_channels.as_str()),
                    ("Ethernets", ethernets.as_str()),
                    ("Linked", linked.as_str()),
                ])
            );
        }
    }

    Ok(())
}
