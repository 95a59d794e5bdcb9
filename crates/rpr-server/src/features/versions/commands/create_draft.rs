//! Create draft command
//!
//! Starts a new draft for an entry by copy-on-write duplication of its
//! most recent version. The new version begins as unconfirmed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{entries, versions, DbError};
use crate::features::versions::derive::derive_next_version;
use crate::models::VersionStatus;

/// Command to start a new draft version for an entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDraftCommand {
    pub entry_id: Uuid,
    /// Email of the acting editor, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

/// Response from creating a draft
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDraftResponse {
    pub id: Uuid,
    pub entry_id: Uuid,
    pub status: VersionStatus,
    pub created_at: DateTime<Utc>,
}

/// Errors that can occur when creating a draft
#[derive(Debug, thiserror::Error)]
pub enum CreateDraftError {
    #[error("Register entry with id '{0}' not found")]
    EntryNotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

#[tracing::instrument(skip(pool, command), fields(entry_id = %command.entry_id))]
pub async fn handle(
    pool: PgPool,
    command: CreateDraftCommand,
) -> Result<CreateDraftResponse, CreateDraftError> {
    let entry = entries::find_entry(&pool, command.entry_id)
        .await?
        .ok_or(CreateDraftError::EntryNotFound(command.entry_id))?;

    let previous = versions::latest_version_for_entry(&pool, entry.id).await?;

    let new = derive_next_version(entry.id, previous.as_ref(), command.created_by);
    let version = versions::create_version(&pool, &new).await?;

    tracing::info!(
        version_id = %version.id,
        entry_id = %entry.id,
        derived_from = ?previous.map(|v| v.id),
        "Created draft version"
    );

    Ok(CreateDraftResponse {
        id: version.id,
        entry_id: version.entry_id,
        status: version.status,
        created_at: version.created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::{TestEntry, TestVersion};
    use crate::models::EntryKind;

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_first_draft_starts_empty(pool: PgPool) {
        let entry = TestEntry::new(EntryKind::Profession, "Farrier").insert(&pool).await;

        let response = handle(
            pool.clone(),
            CreateDraftCommand {
                entry_id: entry.id,
                created_by: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(response.status, VersionStatus::Unconfirmed);

        let created = versions::find_version(&pool, response.id).await.unwrap().unwrap();
        assert!(created.snapshot.summary.is_none());
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_draft_copies_latest_snapshot(pool: PgPool) {
        let entry = TestEntry::new(EntryKind::Profession, "Farrier").insert(&pool).await;
        let live = TestVersion::new(entry.id)
            .with_status(VersionStatus::Live)
            .with_summary("Shoes horses")
            .insert(&pool)
            .await;

        let response = handle(
            pool.clone(),
            CreateDraftCommand {
                entry_id: entry.id,
                created_by: Some("editor@example.com".to_string()),
            },
        )
        .await
        .unwrap();

        let draft = versions::find_version(&pool, response.id).await.unwrap().unwrap();
        assert_ne!(draft.id, live.id);
        assert_eq!(draft.status, VersionStatus::Unconfirmed);
        assert_eq!(draft.snapshot.summary.as_deref(), Some("Shoes horses"));
        assert_eq!(draft.created_by.as_deref(), Some("editor@example.com"));

        // The source version is untouched.
        let source = versions::find_version(&pool, live.id).await.unwrap().unwrap();
        assert_eq!(source.status, VersionStatus::Live);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_missing_entry(pool: PgPool) {
        let result = handle(
            pool.clone(),
            CreateDraftCommand {
                entry_id: Uuid::new_v4(),
                created_by: None,
            },
        )
        .await;

        assert!(matches!(result, Err(CreateDraftError::EntryNotFound(_))));
    }
}
