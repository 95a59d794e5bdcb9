//! Update draft command
//!
//! Replaces the editable fields of an unconfirmed or draft version.
//! Published and archived versions are immutable snapshots and cannot
//! be edited; a new draft must be derived instead.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{versions, DbError};
use crate::features::shared::validation::{validate_optional_url, UrlValidationError};
use crate::models::{VersionSnapshot, VersionStatus};

/// Command to update a draft version's fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateDraftCommand {
    #[serde(default)]
    pub version_id: Uuid,

    #[serde(flatten)]
    pub snapshot: VersionSnapshot,
}

/// Response from updating a draft
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateDraftResponse {
    pub id: Uuid,
    pub entry_id: Uuid,
    pub status: VersionStatus,
    #[serde(flatten)]
    pub snapshot: VersionSnapshot,
}

/// Errors that can occur when updating a draft
#[derive(Debug, thiserror::Error)]
pub enum UpdateDraftError {
    #[error("Version with id '{0}' not found")]
    NotFound(Uuid),

    #[error("Cannot edit a version in status '{0}'")]
    NotEditable(VersionStatus),

    #[error("URL validation failed: {0}")]
    UrlValidation(#[from] UrlValidationError),

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

impl UpdateDraftCommand {
    pub fn validate(&self) -> Result<(), UpdateDraftError> {
        validate_optional_url(self.snapshot.legislation_url.as_deref(), "legislation")?;
        validate_optional_url(self.snapshot.qualification_url.as_deref(), "qualification")?;
        validate_optional_url(self.snapshot.registration_url.as_deref(), "registration")?;
        Ok(())
    }
}

#[tracing::instrument(skip(pool, command), fields(version_id = %command.version_id))]
pub async fn handle(
    pool: PgPool,
    command: UpdateDraftCommand,
) -> Result<UpdateDraftResponse, UpdateDraftError> {
    command.validate()?;

    let version = versions::find_version(&pool, command.version_id)
        .await?
        .ok_or(UpdateDraftError::NotFound(command.version_id))?;

    // The editable statuses are exactly the confirmable ones.
    if !version.status.can_confirm() {
        return Err(UpdateDraftError::NotEditable(version.status));
    }

    let updated = versions::update_snapshot(&pool, version.id, &command.snapshot).await?;

    tracing::info!(
        version_id = %updated.id,
        entry_id = %updated.entry_id,
        "Updated draft version"
    );

    Ok(UpdateDraftResponse {
        id: updated.id,
        entry_id: updated.entry_id,
        status: updated.status,
        snapshot: updated.snapshot,
    })
}
