//! Publish version command
//!
//! Promotes a draft to the entry's live version. The previous live
//! version, if any, is demoted to archived and removed from the search
//! index; the published version is upserted. All relational writes share
//! one transaction, the parent entry row is locked for its duration, and
//! the index calls are issued before the commit so an index failure rolls
//! everything back.
//!
//! Slug assignment for a first-time publish runs after the commit: it is
//! idempotent and scoped to the entry, not the version.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::{entries, versions, DbError};
use crate::features::entries::slug;
use crate::models::VersionStatus;
use crate::search::{index_name, SearchDocument, SearchError, SearchIndex};

/// Command to publish a version
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishVersionCommand {
    pub version_id: Uuid,
}

/// Response from publishing a version
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishVersionResponse {
    pub id: Uuid,
    pub entry_id: Uuid,
    pub status: VersionStatus,
    /// The entry's slug, assigned on first publish
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// The previous live version demoted to archived, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub superseded_version_id: Option<Uuid>,
}

/// Errors that can occur when publishing a version
#[derive(Debug, thiserror::Error)]
pub enum PublishVersionError {
    #[error("Version with id '{0}' not found")]
    NotFound(Uuid),

    #[error("Cannot publish a version in status '{0}'")]
    InvalidTransition(VersionStatus),

    #[error("Search index error: {0}")]
    Index(#[from] SearchError),

    #[error("Slug assignment failed: {0}")]
    SlugAssignment(DbError),

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

#[tracing::instrument(skip(pool, search, command), fields(version_id = %command.version_id))]
pub async fn handle(
    pool: PgPool,
    search: Arc<dyn SearchIndex>,
    command: PublishVersionCommand,
) -> Result<PublishVersionResponse, PublishVersionError> {
    // Un-locked read to learn the parent; the authoritative state is
    // re-read below under the entry lock.
    let peek = versions::find_version(&pool, command.version_id)
        .await?
        .ok_or(PublishVersionError::NotFound(command.version_id))?;

    let mut tx = pool.begin().await.map_err(DbError::from)?;

    // Lock ordering: entry before versions, everywhere. Concurrent
    // publish/archive calls for the same entry queue up here.
    let entry = entries::lock_entry(&mut tx, peek.entry_id)
        .await?
        .ok_or(PublishVersionError::NotFound(command.version_id))?;

    let version = versions::lock_version(&mut tx, command.version_id)
        .await?
        .ok_or(PublishVersionError::NotFound(command.version_id))?;

    if !version.status.can_publish() {
        return Err(PublishVersionError::InvalidTransition(version.status));
    }

    let index = index_name(entry.kind, search.environment());

    let mut superseded_version_id = None;
    if let Some(prior) = versions::lock_live_for_entry(&mut tx, entry.id).await? {
        if prior.id != version.id {
            versions::set_status(&mut tx, prior.id, VersionStatus::Archived).await?;
            search.delete(&index, prior.id).await?;
            superseded_version_id = Some(prior.id);
        }
    }

    let published = versions::set_status(&mut tx, version.id, VersionStatus::Live).await?;

    let document = SearchDocument::for_version(&entry, &published);
    search.upsert(&index, published.id, &document).await?;

    tx.commit().await.map_err(DbError::from)?;

    let entry = if entry.slug.is_none() {
        slug::assign_slug(&pool, &entry)
            .await
            .map_err(PublishVersionError::SlugAssignment)?
    } else {
        entry
    };

    tracing::info!(
        version_id = %published.id,
        entry_id = %entry.id,
        superseded = ?superseded_version_id,
        slug = ?entry.slug,
        "Published version"
    );

    Ok(PublishVersionResponse {
        id: published.id,
        entry_id: published.entry_id,
        status: published.status,
        slug: entry.slug,
        superseded_version_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::{FailingIndex, RecordingIndex, TestEntry, TestVersion};
    use crate::models::EntryKind;

    const INDEX: &str = "professions_test";

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_first_publish_goes_live_and_assigns_slug(pool: PgPool) {
        let entry = TestEntry::new(EntryKind::Profession, "Farrier").insert(&pool).await;
        let draft = TestVersion::new(entry.id)
            .with_status(VersionStatus::Draft)
            .with_summary("Shoes horses")
            .insert(&pool)
            .await;

        let search = Arc::new(RecordingIndex::new());
        let response = handle(
            pool.clone(),
            search.clone(),
            PublishVersionCommand {
                version_id: draft.id,
            },
        )
        .await
        .unwrap();

        assert_eq!(response.status, VersionStatus::Live);
        assert_eq!(response.slug.as_deref(), Some("farrier"));
        assert!(response.superseded_version_id.is_none());

        let published = versions::find_version(&pool, draft.id).await.unwrap().unwrap();
        assert_eq!(published.status, VersionStatus::Live);

        let document = search.document(INDEX, draft.id).unwrap();
        assert_eq!(document.name, "Farrier");
        assert_eq!(document.summary.as_deref(), Some("Shoes horses"));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_publish_demotes_prior_live_to_archived(pool: PgPool) {
        let entry = TestEntry::new(EntryKind::Profession, "Farrier")
            .with_slug("farrier")
            .insert(&pool)
            .await;
        let old_live = TestVersion::new(entry.id)
            .with_status(VersionStatus::Live)
            .insert(&pool)
            .await;
        let draft = TestVersion::new(entry.id)
            .with_status(VersionStatus::Draft)
            .insert(&pool)
            .await;

        let search = Arc::new(RecordingIndex::new());
        search
            .upsert(
                INDEX,
                old_live.id,
                &SearchDocument::for_version(&entry, &old_live),
            )
            .await
            .unwrap();

        let response = handle(
            pool.clone(),
            search.clone(),
            PublishVersionCommand {
                version_id: draft.id,
            },
        )
        .await
        .unwrap();

        assert_eq!(response.superseded_version_id, Some(old_live.id));

        let demoted = versions::find_version(&pool, old_live.id).await.unwrap().unwrap();
        assert_eq!(demoted.status, VersionStatus::Archived);

        let promoted = versions::find_version(&pool, draft.id).await.unwrap().unwrap();
        assert_eq!(promoted.status, VersionStatus::Live);

        assert!(search.contains(INDEX, draft.id));
        assert!(!search.contains(INDEX, old_live.id));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_republish_live_version_refreshes_index(pool: PgPool) {
        let entry = TestEntry::new(EntryKind::Profession, "Farrier")
            .with_slug("farrier")
            .insert(&pool)
            .await;
        let live = TestVersion::new(entry.id)
            .with_status(VersionStatus::Live)
            .insert(&pool)
            .await;

        let search = Arc::new(RecordingIndex::new());
        let response = handle(
            pool.clone(),
            search.clone(),
            PublishVersionCommand {
                version_id: live.id,
            },
        )
        .await
        .unwrap();

        assert_eq!(response.status, VersionStatus::Live);
        assert!(response.superseded_version_id.is_none());
        assert!(search.contains(INDEX, live.id));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_publish_unconfirmed_version_is_rejected(pool: PgPool) {
        let entry = TestEntry::new(EntryKind::Profession, "Farrier").insert(&pool).await;
        let version = TestVersion::new(entry.id)
            .with_status(VersionStatus::Unconfirmed)
            .insert(&pool)
            .await;

        let result = handle(
            pool.clone(),
            Arc::new(RecordingIndex::new()),
            PublishVersionCommand {
                version_id: version.id,
            },
        )
        .await;

        assert!(matches!(
            result,
            Err(PublishVersionError::InvalidTransition(VersionStatus::Unconfirmed))
        ));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_publish_archived_version_is_rejected(pool: PgPool) {
        let entry = TestEntry::new(EntryKind::Profession, "Farrier").insert(&pool).await;
        let version = TestVersion::new(entry.id)
            .with_status(VersionStatus::Archived)
            .insert(&pool)
            .await;

        let result = handle(
            pool.clone(),
            Arc::new(RecordingIndex::new()),
            PublishVersionCommand {
                version_id: version.id,
            },
        )
        .await;

        assert!(matches!(
            result,
            Err(PublishVersionError::InvalidTransition(VersionStatus::Archived))
        ));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_publish_missing_version(pool: PgPool) {
        let result = handle(
            pool.clone(),
            Arc::new(RecordingIndex::new()),
            PublishVersionCommand {
                version_id: Uuid::new_v4(),
            },
        )
        .await;

        assert!(matches!(result, Err(PublishVersionError::NotFound(_))));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_index_failure_rolls_back_all_statuses(pool: PgPool) {
        let entry = TestEntry::new(EntryKind::Profession, "Farrier").insert(&pool).await;
        let old_live = TestVersion::new(entry.id)
            .with_status(VersionStatus::Live)
            .insert(&pool)
            .await;
        let draft = TestVersion::new(entry.id)
            .with_status(VersionStatus::Draft)
            .insert(&pool)
            .await;

        let result = handle(
            pool.clone(),
            Arc::new(FailingIndex),
            PublishVersionCommand {
                version_id: draft.id,
            },
        )
        .await;

        assert!(matches!(result, Err(PublishVersionError::Index(_))));

        // Nothing moved: the draft is still a draft, the live version is
        // still live, and no slug was assigned.
        let draft_after = versions::find_version(&pool, draft.id).await.unwrap().unwrap();
        assert_eq!(draft_after.status, VersionStatus::Draft);

        let live_after = versions::find_version(&pool, old_live.id).await.unwrap().unwrap();
        assert_eq!(live_after.status, VersionStatus::Live);

        let entry_after = crate::db::entries::find_entry(&pool, entry.id)
            .await
            .unwrap()
            .unwrap();
        assert!(entry_after.slug.is_none());
    }
}
