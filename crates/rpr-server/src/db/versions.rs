//! Database operations for entry versions.
//!
//! Versions are full snapshots of a register entry's editable fields,
//! tagged with a lifecycle status. The lifecycle handlers drive every
//! mutation through a transaction; the connection-based functions here
//! exist so those handlers can row-lock what they read.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use super::{DbError, DbResult};
use crate::models::{EntryVersion, VersionSnapshot, VersionStatus};

const VERSION_COLUMNS: &str = "id, entry_id, status, summary, alternate_name, \
     regulation_summary, reserved_activities, legislation_name, legislation_url, \
     qualification_summary, qualification_url, registration_requirements, \
     registration_url, contact_email, contact_phone, contact_address, \
     created_by, created_at, updated_at";

/// Input for creating a version row.
#[derive(Debug, Clone)]
pub struct NewVersion {
    pub entry_id: Uuid,
    pub status: VersionStatus,
    pub snapshot: VersionSnapshot,
    pub created_by: Option<String>,
}

/// Inserts a new version for an entry.
pub async fn create_version(pool: &PgPool, new: &NewVersion) -> DbResult<EntryVersion> {
    let version = sqlx::query_as::<_, EntryVersion>(&format!(
        r#"
        INSERT INTO entry_versions (
            entry_id, status, summary, alternate_name, regulation_summary,
            reserved_activities, legislation_name, legislation_url,
            qualification_summary, qualification_url, registration_requirements,
            registration_url, contact_email, contact_phone, contact_address,
            created_by
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
        RETURNING {}
        "#,
        VERSION_COLUMNS
    ))
    .bind(new.entry_id)
    .bind(new.status)
    .bind(&new.snapshot.summary)
    .bind(&new.snapshot.alternate_name)
    .bind(&new.snapshot.regulation_summary)
    .bind(&new.snapshot.reserved_activities)
    .bind(&new.snapshot.legislation_name)
    .bind(&new.snapshot.legislation_url)
    .bind(&new.snapshot.qualification_summary)
    .bind(&new.snapshot.qualification_url)
    .bind(&new.snapshot.registration_requirements)
    .bind(&new.snapshot.registration_url)
    .bind(&new.snapshot.contact_email)
    .bind(&new.snapshot.contact_phone)
    .bind(&new.snapshot.contact_address)
    .bind(&new.created_by)
    .fetch_one(pool)
    .await?;

    tracing::info!(
        version_id = %version.id,
        entry_id = %version.entry_id,
        status = %version.status,
        "Created version"
    );

    Ok(version)
}

/// Retrieves a version by id, or `None` when it does not exist.
pub async fn find_version(pool: &PgPool, id: Uuid) -> DbResult<Option<EntryVersion>> {
    let version = sqlx::query_as::<_, EntryVersion>(&format!(
        "SELECT {} FROM entry_versions WHERE id = $1",
        VERSION_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(version)
}

/// Retrieves a version by id and row-locks it for the enclosing transaction.
pub async fn lock_version(conn: &mut PgConnection, id: Uuid) -> DbResult<Option<EntryVersion>> {
    let version = sqlx::query_as::<_, EntryVersion>(&format!(
        "SELECT {} FROM entry_versions WHERE id = $1 FOR UPDATE",
        VERSION_COLUMNS
    ))
    .bind(id)
    .fetch_optional(conn)
    .await?;

    Ok(version)
}

/// Finds the entry's live version, if it has one.
pub async fn find_live_for_entry(
    conn: &mut PgConnection,
    entry_id: Uuid,
) -> DbResult<Option<EntryVersion>> {
    let version = sqlx::query_as::<_, EntryVersion>(&format!(
        "SELECT {} FROM entry_versions WHERE entry_id = $1 AND status = 'live'",
        VERSION_COLUMNS
    ))
    .bind(entry_id)
    .fetch_optional(conn)
    .await?;

    Ok(version)
}

/// Finds and row-locks the entry's live version, if it has one.
///
/// Publish and archive both demote the current live version; locking it
/// here keeps two concurrent calls from demoting inconsistently.
pub async fn lock_live_for_entry(
    conn: &mut PgConnection,
    entry_id: Uuid,
) -> DbResult<Option<EntryVersion>> {
    let version = sqlx::query_as::<_, EntryVersion>(&format!(
        "SELECT {} FROM entry_versions WHERE entry_id = $1 AND status = 'live' FOR UPDATE",
        VERSION_COLUMNS
    ))
    .bind(entry_id)
    .fetch_optional(conn)
    .await?;

    Ok(version)
}

/// Gets the entry's most recently created version, if any.
///
/// New drafts are derived from this version's snapshot.
pub async fn latest_version_for_entry(
    pool: &PgPool,
    entry_id: Uuid,
) -> DbResult<Option<EntryVersion>> {
    let version = sqlx::query_as::<_, EntryVersion>(&format!(
        r#"
        SELECT {}
        FROM entry_versions
        WHERE entry_id = $1
        ORDER BY created_at DESC
        LIMIT 1
        "#,
        VERSION_COLUMNS
    ))
    .bind(entry_id)
    .fetch_optional(pool)
    .await?;

    Ok(version)
}

/// Lists all versions for an entry, newest first.
pub async fn list_versions_for_entry(pool: &PgPool, entry_id: Uuid) -> DbResult<Vec<EntryVersion>> {
    let versions = sqlx::query_as::<_, EntryVersion>(&format!(
        r#"
        SELECT {}
        FROM entry_versions
        WHERE entry_id = $1
        ORDER BY created_at DESC
        "#,
        VERSION_COLUMNS
    ))
    .bind(entry_id)
    .fetch_all(pool)
    .await?;

    Ok(versions)
}

/// Collects the ids of every version belonging to an entry.
pub async fn version_ids_for_entry(
    conn: &mut PgConnection,
    entry_id: Uuid,
) -> DbResult<Vec<Uuid>> {
    let ids = sqlx::query_scalar::<_, Uuid>("SELECT id FROM entry_versions WHERE entry_id = $1")
        .bind(entry_id)
        .fetch_all(conn)
        .await?;

    Ok(ids)
}

/// Replaces a version's snapshot fields.
///
/// Only drafts are editable; the caller checks status first. Published
/// and archived snapshots stay immutable.
pub async fn update_snapshot(
    pool: &PgPool,
    id: Uuid,
    snapshot: &VersionSnapshot,
) -> DbResult<EntryVersion> {
    let version = sqlx::query_as::<_, EntryVersion>(&format!(
        r#"
        UPDATE entry_versions
        SET summary = $2, alternate_name = $3, regulation_summary = $4,
            reserved_activities = $5, legislation_name = $6, legislation_url = $7,
            qualification_summary = $8, qualification_url = $9,
            registration_requirements = $10, registration_url = $11,
            contact_email = $12, contact_phone = $13, contact_address = $14,
            updated_at = now()
        WHERE id = $1
        RETURNING {}
        "#,
        VERSION_COLUMNS
    ))
    .bind(id)
    .bind(&snapshot.summary)
    .bind(&snapshot.alternate_name)
    .bind(&snapshot.regulation_summary)
    .bind(&snapshot.reserved_activities)
    .bind(&snapshot.legislation_name)
    .bind(&snapshot.legislation_url)
    .bind(&snapshot.qualification_summary)
    .bind(&snapshot.qualification_url)
    .bind(&snapshot.registration_requirements)
    .bind(&snapshot.registration_url)
    .bind(&snapshot.contact_email)
    .bind(&snapshot.contact_phone)
    .bind(&snapshot.contact_address)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DbError::not_found("Version", id))?;

    tracing::debug!(version_id = %id, "Updated version snapshot");

    Ok(version)
}

/// Updates a version's status inside the caller's transaction.
pub async fn set_status(
    conn: &mut PgConnection,
    id: Uuid,
    status: VersionStatus,
) -> DbResult<EntryVersion> {
    let version = sqlx::query_as::<_, EntryVersion>(&format!(
        r#"
        UPDATE entry_versions
        SET status = $2, updated_at = now()
        WHERE id = $1
        RETURNING {}
        "#,
        VERSION_COLUMNS
    ))
    .bind(id)
    .bind(status)
    .fetch_optional(conn)
    .await?
    .ok_or_else(|| DbError::not_found("Version", id))?;

    tracing::debug!(version_id = %id, status = %status, "Updated version status");

    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::entries::create_entry;
    use crate::models::EntryKind;

    fn draft_for(entry_id: Uuid) -> NewVersion {
        NewVersion {
            entry_id,
            status: VersionStatus::Draft,
            snapshot: VersionSnapshot {
                summary: Some("Shoes horses".to_string()),
                ..Default::default()
            },
            created_by: Some("editor@example.com".to_string()),
        }
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_create_and_find_version(pool: PgPool) {
        let entry = create_entry(&pool, EntryKind::Profession, "Farrier")
            .await
            .unwrap();

        let version = create_version(&pool, &draft_for(entry.id)).await.unwrap();
        assert_eq!(version.entry_id, entry.id);
        assert_eq!(version.status, VersionStatus::Draft);
        assert_eq!(version.snapshot.summary.as_deref(), Some("Shoes horses"));

        let fetched = find_version(&pool, version.id).await.unwrap().unwrap();
        assert_eq!(fetched.id, version.id);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_no_live_version_for_fresh_entry(pool: PgPool) {
        let entry = create_entry(&pool, EntryKind::Profession, "Farrier")
            .await
            .unwrap();
        create_version(&pool, &draft_for(entry.id)).await.unwrap();

        let mut tx = pool.begin().await.unwrap();
        let live = find_live_for_entry(&mut tx, entry.id).await.unwrap();
        assert!(live.is_none());
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_set_status(pool: PgPool) {
        let entry = create_entry(&pool, EntryKind::Profession, "Farrier")
            .await
            .unwrap();
        let version = create_version(&pool, &draft_for(entry.id)).await.unwrap();

        let mut tx = pool.begin().await.unwrap();
        let updated = set_status(&mut tx, version.id, VersionStatus::Live)
            .await
            .unwrap();
        tx.commit().await.unwrap();

        assert_eq!(updated.status, VersionStatus::Live);

        let mut tx = pool.begin().await.unwrap();
        let live = lock_live_for_entry(&mut tx, entry.id).await.unwrap();
        assert_eq!(live.unwrap().id, version.id);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_set_status_missing_version(pool: PgPool) {
        let mut tx = pool.begin().await.unwrap();
        let result = set_status(&mut tx, Uuid::new_v4(), VersionStatus::Draft).await;
        assert!(matches!(result, Err(DbError::NotFound(_))));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_version_ids_for_entry(pool: PgPool) {
        let entry = create_entry(&pool, EntryKind::Profession, "Farrier")
            .await
            .unwrap();
        let v1 = create_version(&pool, &draft_for(entry.id)).await.unwrap();
        let v2 = create_version(&pool, &draft_for(entry.id)).await.unwrap();

        let mut tx = pool.begin().await.unwrap();
        let ids = version_ids_for_entry(&mut tx, entry.id).await.unwrap();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&v1.id));
        assert!(ids.contains(&v2.id));
    }
}
