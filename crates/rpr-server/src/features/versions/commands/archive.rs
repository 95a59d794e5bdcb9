//! Archive version command
//!
//! Withdraws a draft without it ever becoming visible. If the entry has a
//! live version, that version is demoted to draft rather than archived:
//! withdrawing a replacement must not destroy the previously published
//! record, it restores it to an editable state. Publish demotes to
//! archived instead; the asymmetry is deliberate.
//!
//! The search index is then cleared of every version of the entry except
//! one still live, so only published content stays searchable. Index
//! calls happen before the commit and roll the transaction back on
//! failure, exactly as in publish.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::{entries, versions, DbError};
use crate::models::VersionStatus;
use crate::search::{index_name, SearchError, SearchIndex};

/// Command to archive a version
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveVersionCommand {
    pub version_id: Uuid,
}

/// Response from archiving a version
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveVersionResponse {
    pub id: Uuid,
    pub entry_id: Uuid,
    pub status: VersionStatus,
    /// The previously live version restored to draft, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restored_version_id: Option<Uuid>,
}

/// Errors that can occur when archiving a version
#[derive(Debug, thiserror::Error)]
pub enum ArchiveVersionError {
    #[error("Version with id '{0}' not found")]
    NotFound(Uuid),

    #[error("Cannot archive a version in status '{0}'")]
    InvalidTransition(VersionStatus),

    #[error("Search index error: {0}")]
    Index(#[from] SearchError),

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

#[tracing::instrument(skip(pool, search, command), fields(version_id = %command.version_id))]
pub async fn handle(
    pool: PgPool,
    search: Arc<dyn SearchIndex>,
    command: ArchiveVersionCommand,
) -> Result<ArchiveVersionResponse, ArchiveVersionError> {
    let peek = versions::find_version(&pool, command.version_id)
        .await?
        .ok_or(ArchiveVersionError::NotFound(command.version_id))?;

    let mut tx = pool.begin().await.map_err(DbError::from)?;

    // Same lock ordering as publish: entry row first, then version rows.
    let entry = entries::lock_entry(&mut tx, peek.entry_id)
        .await?
        .ok_or(ArchiveVersionError::NotFound(command.version_id))?;

    let version = versions::lock_version(&mut tx, command.version_id)
        .await?
        .ok_or(ArchiveVersionError::NotFound(command.version_id))?;

    if !version.status.can_archive() {
        return Err(ArchiveVersionError::InvalidTransition(version.status));
    }

    let mut restored_version_id = None;
    if let Some(prior) = versions::lock_live_for_entry(&mut tx, entry.id).await? {
        if prior.id != version.id {
            versions::set_status(&mut tx, prior.id, VersionStatus::Draft).await?;
            restored_version_id = Some(prior.id);
        }
    }

    let archived = versions::set_status(&mut tx, version.id, VersionStatus::Archived).await?;

    // Only a still-live version may stay searchable; after the demotion
    // above there normally is none, so the entry's whole lineage goes.
    let still_live = versions::find_live_for_entry(&mut tx, entry.id)
        .await?
        .map(|v| v.id);
    let to_remove: Vec<Uuid> = versions::version_ids_for_entry(&mut tx, entry.id)
        .await?
        .into_iter()
        .filter(|id| Some(*id) != still_live)
        .collect();

    let index = index_name(entry.kind, search.environment());
    search.bulk_delete(&index, &to_remove).await?;

    tx.commit().await.map_err(DbError::from)?;

    tracing::info!(
        version_id = %archived.id,
        entry_id = %entry.id,
        restored = ?restored_version_id,
        removed_from_index = to_remove.len(),
        "Archived version"
    );

    Ok(ArchiveVersionResponse {
        id: archived.id,
        entry_id: archived.entry_id,
        status: archived.status,
        restored_version_id,
    })
}
