//! Naming and templates for new migration files
//!
//! Filenames carry a fixed-width UTC timestamp prefix so lexical order
//! follows creation order, which is what out-of-order detection relies on.

use crate::error::{CoreError, CoreResult};
use crate::migration::MigrationKind;
use chrono::{DateTime, Utc};

/// Timestamp prefix format, fixed width
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Body written into new SQL migrations
pub const SQL_TEMPLATE: &str = "-- add your migration here";

/// Body written into new executable migrations
pub const COMMAND_TEMPLATE: &str = "#!/bin/sh\n# add your migration here\nexit 0\n";

/// Build `<timestamp>-<slug>.<ext>` for a new migration.
///
/// Slug words are joined with `-`.
pub fn migration_filename(slug: &str, ext: &str, now: DateTime<Utc>) -> CoreResult<String> {
    let slug = normalize_slug(slug)?;
    let ext = ext.trim().trim_start_matches('.');
    if ext.is_empty() || ext.contains(['/', '\\', '.']) {
        return Err(CoreError::InvalidSlug {
            slug,
            reason: format!("unusable extension '{}'", ext),
        });
    }
    Ok(format!("{}-{}.{}", now.format(TIMESTAMP_FORMAT), slug, ext))
}

/// Initial content for a new migration of the given filename
pub fn template_for(filename: &str) -> &'static str {
    match MigrationKind::from_filename(filename) {
        MigrationKind::Sql => SQL_TEMPLATE,
        MigrationKind::Command => COMMAND_TEMPLATE,
    }
}

fn normalize_slug(slug: &str) -> CoreResult<String> {
    let joined = slug.split_whitespace().collect::<Vec<_>>().join("-");
    if joined.is_empty() {
        return Err(CoreError::InvalidSlug {
            slug: slug.to_string(),
            reason: "slug cannot be empty".to_string(),
        });
    }
    if joined.contains(['/', '\\']) {
        return Err(CoreError::InvalidSlug {
            slug: slug.to_string(),
            reason: "slug cannot contain path separators".to_string(),
        });
    }
    Ok(joined)
}
