//! Confirm version command
//!
//! Marks an unconfirmed version as a draft ready for publication review.
//! Confirming an existing draft is a no-op transition and stays allowed;
//! no search index effect either way.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{versions, DbError};
use crate::models::VersionStatus;

/// Command to confirm a version into draft
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmVersionCommand {
    pub version_id: Uuid,
}

/// Response from confirming a version
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmVersionResponse {
    pub id: Uuid,
    pub entry_id: Uuid,
    pub status: VersionStatus,
}

/// Errors that can occur when confirming a version
#[derive(Debug, thiserror::Error)]
pub enum ConfirmVersionError {
    #[error("Version with id '{0}' not found")]
    NotFound(Uuid),

    #[error("Cannot confirm a version in status '{0}'")]
    InvalidTransition(VersionStatus),

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

#[tracing::instrument(skip(pool, command), fields(version_id = %command.version_id))]
pub async fn handle(
    pool: PgPool,
    command: ConfirmVersionCommand,
) -> Result<ConfirmVersionResponse, ConfirmVersionError> {
    let mut tx = pool.begin().await.map_err(DbError::from)?;

    let version = versions::lock_version(&mut tx, command.version_id)
        .await?
        .ok_or(ConfirmVersionError::NotFound(command.version_id))?;

    if !version.status.can_confirm() {
        return Err(ConfirmVersionError::InvalidTransition(version.status));
    }

    let confirmed = versions::set_status(&mut tx, version.id, VersionStatus::Draft).await?;

    tx.commit().await.map_err(DbError::from)?;

    tracing::info!(
        version_id = %confirmed.id,
        entry_id = %confirmed.entry_id,
        "Confirmed version"
    );

    Ok(ConfirmVersionResponse {
        id: confirmed.id,
        entry_id: confirmed.entry_id,
        status: confirmed.status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::{TestEntry, TestVersion};
    use crate::models::EntryKind;

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_confirm_unconfirmed_version(pool: PgPool) {
        let entry = TestEntry::new(EntryKind::Profession, "Farrier").insert(&pool).await;
        let version = TestVersion::new(entry.id)
            .with_status(VersionStatus::Unconfirmed)
            .insert(&pool)
            .await;

        let response = handle(
            pool.clone(),
            ConfirmVersionCommand {
                version_id: version.id,
            },
        )
        .await
        .unwrap();

        assert_eq!(response.status, VersionStatus::Draft);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_confirm_draft_stays_draft(pool: PgPool) {
        let entry = TestEntry::new(EntryKind::Profession, "Farrier").insert(&pool).await;
        let version = TestVersion::new(entry.id)
            .with_status(VersionStatus::Draft)
            .insert(&pool)
            .await;

        let response = handle(
            pool.clone(),
            ConfirmVersionCommand {
                version_id: version.id,
            },
        )
        .await
        .unwrap();

        assert_eq!(response.status, VersionStatus::Draft);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_confirm_live_version_is_rejected(pool: PgPool) {
        let entry = TestEntry::new(EntryKind::Profession, "Farrier").insert(&pool).await;
        let version = TestVersion::new(entry.id)
            .with_status(VersionStatus::Live)
            .insert(&pool)
            .await;

        let result = handle(
            pool.clone(),
            ConfirmVersionCommand {
                version_id: version.id,
            },
        )
        .await;

        assert!(matches!(
            result,
            Err(ConfirmVersionError::InvalidTransition(VersionStatus::Live))
        ));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_confirm_archived_version_is_rejected(pool: PgPool) {
        let entry = TestEntry::new(EntryKind::Profession, "Farrier").insert(&pool).await;
        let version = TestVersion::new(entry.id)
            .with_status(VersionStatus::Archived)
            .insert(&pool)
            .await;

        let result = handle(
            pool.clone(),
            ConfirmVersionCommand {
                version_id: version.id,
            },
        )
        .await;

        assert!(matches!(
            result,
            Err(ConfirmVersionError::InvalidTransition(VersionStatus::Archived))
        ));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_confirm_missing_version(pool: PgPool) {
        let result = handle(
            pool.clone(),
            ConfirmVersionCommand {
                version_id: Uuid::new_v4(),
            },
        )
        .await;

        assert!(matches!(result, Err(ConfirmVersionError::NotFound(_))));
    }
}
