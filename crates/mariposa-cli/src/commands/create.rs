//! Create command implementation

use anyhow::Result;
use chrono::Utc;
use mariposa_engine::create_migration;

use crate::cli::{CreateArgs, GlobalArgs};
use crate::context::load_settings;

/// Execute the create command
///
/// Needs no database connection, only the migration directory.
pub async fn execute(args: &CreateArgs, global: &GlobalArgs) -> Result<()> {
    let settings = load_settings(global)?;
    let slug = args.slug.join(" ");

    let created = create_migration(
        &settings.directory,
        &slug,
        &args.ext,
        Utc::now(),
        settings.dry_run,
    )?;
    println!("{}", created.message());
    Ok(())
}
