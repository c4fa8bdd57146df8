//! Runtime context for CLI commands

use anyhow::{Context, Result};
use mariposa_core::{Config, Settings};
use mariposa_db::Database;
use mariposa_engine::{MigrateOptions, Migrator};
use std::path::Path;
use std::sync::Arc;

use crate::cli::GlobalArgs;

/// Resolve settings from flags, environment, and the project file.
pub fn load_settings(args: &GlobalArgs) -> Result<Settings> {
    let config = match &args.config {
        Some(path) => Some(Config::load(path).context("Failed to load configuration file")?),
        None => Config::load_optional_from_dir(Path::new("."))
            .context("Failed to load project configuration")?,
    };

    let settings = Settings::resolve(args.overrides(), config.as_ref());
    log::debug!(
        "Using {} engine, migrations in {}",
        settings.engine,
        settings.directory.display()
    );
    Ok(settings)
}

/// Runtime context containing resolved settings and a database connection
pub struct RuntimeContext {
    pub settings: Settings,
    pub db: Arc<dyn Database>,
}

impl RuntimeContext {
    /// Create a new runtime context from global arguments
    pub async fn new(args: &GlobalArgs) -> Result<Self> {
        let settings = load_settings(args)?;
        let db = mariposa_db::connect(
            settings.engine,
            &settings.connection,
            settings.schema.as_deref(),
        )
        .await
        .context("Failed to connect to database")?;

        Ok(Self { settings, db })
    }

    pub fn migrator(&self) -> Migrator {
        Migrator::new(self.db.clone(), MigrateOptions::from(&self.settings))
    }
}
