//! Get register entry query

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{entries, versions, DbError};
use crate::models::{EntryKind, VersionStatus};

/// Query to fetch a register entry with its version history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetEntryQuery {
    pub id: Uuid,
}

/// Summary of one version in the entry's history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionSummary {
    pub id: Uuid,
    pub status: VersionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Response for a register entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetEntryResponse {
    pub id: Uuid,
    pub kind: EntryKind,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_version_id: Option<Uuid>,
    pub versions: Vec<VersionSummary>,
    pub created_at: DateTime<Utc>,
}

/// Errors that can occur when fetching a register entry
#[derive(Debug, thiserror::Error)]
pub enum GetEntryError {
    #[error("Register entry with id '{0}' not found")]
    NotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

#[tracing::instrument(skip(pool), fields(entry_id = %query.id))]
pub async fn handle(pool: PgPool, query: GetEntryQuery) -> Result<GetEntryResponse, GetEntryError> {
    let entry = entries::find_entry(&pool, query.id)
        .await?
        .ok_or(GetEntryError::NotFound(query.id))?;

    let history = versions::list_versions_for_entry(&pool, entry.id).await?;

    let live_version_id = history
        .iter()
        .find(|v| v.status == VersionStatus::Live)
        .map(|v| v.id);

    let versions = history
        .into_iter()
        .map(|v| VersionSummary {
            id: v.id,
            status: v.status,
            created_by: v.created_by,
            created_at: v.created_at,
        })
        .collect();

    Ok(GetEntryResponse {
        id: entry.id,
        kind: entry.kind,
        name: entry.name,
        slug: entry.slug,
        live_version_id,
        versions,
        created_at: entry.created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::{TestEntry, TestVersion};

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_get_entry_with_history(pool: PgPool) {
        let entry = TestEntry::new(EntryKind::Profession, "Farrier")
            .with_slug("farrier")
            .insert(&pool)
            .await;
        let live = TestVersion::new(entry.id)
            .with_status(VersionStatus::Live)
            .insert(&pool)
            .await;
        TestVersion::new(entry.id)
            .with_status(VersionStatus::Draft)
            .insert(&pool)
            .await;

        let response = handle(pool.clone(), GetEntryQuery { id: entry.id })
            .await
            .unwrap();

        assert_eq!(response.name, "Farrier");
        assert_eq!(response.versions.len(), 2);
        assert_eq!(response.live_version_id, Some(live.id));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_get_missing_entry(pool: PgPool) {
        let result = handle(pool.clone(), GetEntryQuery { id: Uuid::new_v4() }).await;
        assert!(matches!(result, Err(GetEntryError::NotFound(_))));
    }
}
