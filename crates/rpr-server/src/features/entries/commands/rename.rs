//! Rename register entry command
//!
//! Renaming is a deliberate administrative correction of a published
//! entry's name, distinct from the version flow. A renamed entry that
//! already carries a slug is re-slugified through the collision probe;
//! an entry that was never published keeps its NULL slug.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{entries, DbError};
use crate::features::entries::slug::{resolve_unique_slug, slugify};
use crate::features::shared::validation::{validate_name, NameValidationError};
use crate::models::EntryKind;

/// Command to rename a register entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameEntryCommand {
    #[serde(default)]
    pub id: Uuid,
    pub name: String,
}

/// Response from renaming a register entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameEntryResponse {
    pub id: Uuid,
    pub kind: EntryKind,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

/// Errors that can occur when renaming a register entry
#[derive(Debug, thiserror::Error)]
pub enum RenameEntryError {
    #[error("Register entry with id '{0}' not found")]
    NotFound(Uuid),

    #[error("Name validation failed: {0}")]
    NameValidation(#[from] NameValidationError),

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

impl RenameEntryCommand {
    pub fn validate(&self) -> Result<(), RenameEntryError> {
        validate_name(&self.name, 256)?;
        Ok(())
    }
}

#[tracing::instrument(skip(pool, command), fields(entry_id = %command.id, name = %command.name))]
pub async fn handle(
    pool: PgPool,
    command: RenameEntryCommand,
) -> Result<RenameEntryResponse, RenameEntryError> {
    command.validate()?;

    let entry = entries::find_entry(&pool, command.id)
        .await?
        .ok_or(RenameEntryError::NotFound(command.id))?;

    let new_slug = match entry.slug.as_deref() {
        // The new name may slugify back to the slug the entry already
        // holds; probing would then collide with our own row.
        Some(current) if current == slugify(&command.name) => entry.slug.clone(),
        Some(_) => Some(resolve_unique_slug(&pool, entry.kind, &command.name).await?),
        None => None,
    };

    let renamed =
        entries::rename_entry(&pool, entry.id, &command.name, new_slug.as_deref()).await?;

    tracing::info!(
        entry_id = %renamed.id,
        slug = ?renamed.slug,
        "Renamed register entry"
    );

    Ok(RenameEntryResponse {
        id: renamed.id,
        kind: renamed.kind,
        name: renamed.name,
        slug: renamed.slug,
    })
}
