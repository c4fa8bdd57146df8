//! Migrate command implementation

use anyhow::Result;

use crate::cli::GlobalArgs;
use crate::context::RuntimeContext;

/// Execute the migrate command
pub async fn execute(global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global).await?;
    let report = ctx.migrator().migrate().await?;

    if report.dry_run {
        let plan = report.rendered_plan();
        if !plan.is_empty() {
            println!("{}", plan);
        }
        return Ok(());
    }

    if report.applied.is_empty() {
        println!("Nothing to migrate");
        return Ok(());
    }

    println!("Applied {} migration(s)", report.applied.len());
    for filename in &report.applied {
        println!("  {}", filename);
    }
    Ok(())
}
