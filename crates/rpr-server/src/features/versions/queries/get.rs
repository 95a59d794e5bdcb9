//! Get version query

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{versions, DbError};
use crate::models::{VersionSnapshot, VersionStatus};

/// Query to fetch a single version with its full snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetVersionQuery {
    pub version_id: Uuid,
}

/// Response for a version
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetVersionResponse {
    pub id: Uuid,
    pub entry_id: Uuid,
    pub status: VersionStatus,
    #[serde(flatten)]
    pub snapshot: VersionSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Errors that can occur when fetching a version
#[derive(Debug, thiserror::Error)]
pub enum GetVersionError {
    #[error("Version with id '{0}' not found")]
    NotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

#[tracing::instrument(skip(pool), fields(version_id = %query.version_id))]
pub async fn handle(
    pool: PgPool,
    query: GetVersionQuery,
) -> Result<GetVersionResponse, GetVersionError> {
    let version = versions::find_version(&pool, query.version_id)
        .await?
        .ok_or(GetVersionError::NotFound(query.version_id))?;

    Ok(GetVersionResponse {
        id: version.id,
        entry_id: version.entry_id,
        status: version.status,
        snapshot: version.snapshot,
        created_by: version.created_by,
        created_at: version.created_at,
        updated_at: version.updated_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::{TestEntry, TestVersion};
    use crate::models::EntryKind;

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_get_version_returns_snapshot(pool: PgPool) {
        let entry = TestEntry::new(EntryKind::Profession, "Farrier").insert(&pool).await;
        let version = TestVersion::new(entry.id)
            .with_summary("Shoes horses")
            .insert(&pool)
            .await;

        let response = handle(
            pool.clone(),
            GetVersionQuery {
                version_id: version.id,
            },
        )
        .await
        .unwrap();

        assert_eq!(response.entry_id, entry.id);
        assert_eq!(response.snapshot.summary.as_deref(), Some("Shoes horses"));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_get_missing_version(pool: PgPool) {
        let result = handle(
            pool.clone(),
            GetVersionQuery {
                version_id: Uuid::new_v4(),
            },
        )
        .await;

        assert!(matches!(result, Err(GetVersionError::NotFound(_))));
    }
}
