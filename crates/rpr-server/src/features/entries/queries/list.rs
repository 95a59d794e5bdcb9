//! List register entries query

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{entries, DbError};
use crate::features::shared::pagination::{Paginated, PaginationParams};
use crate::models::EntryKind;

/// Query to list register entries, optionally filtered by kind
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ListEntriesQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<EntryKind>,

    #[serde(flatten)]
    pub pagination: PaginationParams,
}

/// One entry in the listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryListItem {
    pub id: Uuid,
    pub kind: EntryKind,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub type ListEntriesResponse = Paginated<EntryListItem>;

/// Errors that can occur when listing register entries
#[derive(Debug, thiserror::Error)]
pub enum ListEntriesError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

#[tracing::instrument(skip(pool, query), fields(kind = ?query.kind))]
pub async fn handle(
    pool: PgPool,
    query: ListEntriesQuery,
) -> Result<ListEntriesResponse, ListEntriesError> {
    let total = entries::count_entries(&pool, query.kind).await?;
    let rows =
        entries::list_entries(&pool, query.kind, query.pagination.to_pagination()).await?;

    let items = rows
        .into_iter()
        .map(|e| EntryListItem {
            id: e.id,
            kind: e.kind,
            name: e.name,
            slug: e.slug,
            created_at: e.created_at,
        })
        .collect();

    Ok(Paginated::new(items, &query.pagination, total))
}
