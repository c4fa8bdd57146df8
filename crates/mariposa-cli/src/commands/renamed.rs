//! Renamed command implementation

use anyhow::Result;

use crate::cli::GlobalArgs;
use crate::context::RuntimeContext;

/// Execute the renamed command
pub async fn execute(global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global).await?;
    let report = ctx.migrator().renamed().await?;

    let Some(sql) = &report.sql else {
        if !report.dry_run {
            println!("No renamed migrations");
        }
        return Ok(());
    };

    if report.dry_run {
        println!("{}", sql);
        return Ok(());
    }

    for rename in &report.renames {
        println!("  {} -> {}", rename.old_filename, rename.new_filename);
    }
    Ok(())
}
