//! List versions query

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{entries, versions, DbError};
use crate::models::VersionStatus;

/// Query to list all versions of an entry, newest first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListVersionsQuery {
    pub entry_id: Uuid,
}

/// One version in the listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionListItem {
    pub id: Uuid,
    pub status: VersionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Response listing an entry's versions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListVersionsResponse {
    pub entry_id: Uuid,
    pub items: Vec<VersionListItem>,
}

/// Errors that can occur when listing versions
#[derive(Debug, thiserror::Error)]
pub enum ListVersionsError {
    #[error("Register entry with id '{0}' not found")]
    EntryNotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

#[tracing::instrument(skip(pool), fields(entry_id = %query.entry_id))]
pub async fn handle(
    pool: PgPool,
    query: ListVersionsQuery,
) -> Result<ListVersionsResponse, ListVersionsError> {
    let entry = entries::find_entry(&pool, query.entry_id)
        .await?
        .ok_or(ListVersionsError::EntryNotFound(query.entry_id))?;

    let items = versions::list_versions_for_entry(&pool, entry.id)
        .await?
        .into_iter()
        .map(|v| VersionListItem {
            id: v.id,
            status: v.status,
            summary: v.snapshot.summary,
            created_by: v.created_by,
            created_at: v.created_at,
        })
        .collect();

    Ok(ListVersionsResponse {
        entry_id: entry.id,
        items,
    })
}
