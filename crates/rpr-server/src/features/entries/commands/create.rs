//! Create register entry command

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{entries, DbError};
use crate::features::shared::validation::{validate_name, NameValidationError};
use crate::models::EntryKind;

/// Command to create a new register entry
///
/// The entry starts with no slug and no versions; a slug is assigned when
/// its first version is published.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEntryCommand {
    pub kind: EntryKind,
    pub name: String,
}

/// Response from creating a register entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEntryResponse {
    pub id: Uuid,
    pub kind: EntryKind,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Errors that can occur when creating a register entry
#[derive(Debug, thiserror::Error)]
pub enum CreateEntryError {
    #[error("Name validation failed: {0}")]
    NameValidation(#[from] NameValidationError),

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

impl CreateEntryCommand {
    pub fn validate(&self) -> Result<(), CreateEntryError> {
        validate_name(&self.name, 256)?;
        Ok(())
    }
}

#[tracing::instrument(skip(pool, command), fields(kind = %command.kind, name = %command.name))]
pub async fn handle(
    pool: PgPool,
    command: CreateEntryCommand,
) -> Result<CreateEntryResponse, CreateEntryError> {
    command.validate()?;

    let entry = entries::create_entry(&pool, command.kind, &command.name).await?;

    Ok(CreateEntryResponse {
        id: entry.id,
        kind: entry.kind,
        name: entry.name,
        slug: entry.slug,
        created_at: entry.created_at,
    })
}
