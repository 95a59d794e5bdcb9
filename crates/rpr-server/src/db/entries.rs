//! Database operations for register entries.
//!
//! Register entries are the parent records of the register: regulated
//! professions and the regulatory bodies that oversee them. An entry owns
//! a history of versions (see [`super::versions`]); its `slug` stays NULL
//! until the first version is published.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use super::DbResult;
use crate::models::{EntryKind, RegisterEntry};
use rpr_common::types::Pagination;

const ENTRY_COLUMNS: &str = "id, kind, name, slug, created_at, updated_at";

/// Creates a new register entry with no slug and no versions.
pub async fn create_entry(pool: &PgPool, kind: EntryKind, name: &str) -> DbResult<RegisterEntry> {
    let entry = sqlx::query_as::<_, RegisterEntry>(&format!(
        "INSERT INTO register_entries (kind, name) VALUES ($1, $2) RETURNING {}",
        ENTRY_COLUMNS
    ))
    .bind(kind)
    .bind(name)
    .fetch_one(pool)
    .await?;

    tracing::info!(entry_id = %entry.id, kind = %kind, name = %name, "Created register entry");

    Ok(entry)
}

/// Retrieves an entry by id, or `None` when it does not exist.
pub async fn find_entry(pool: &PgPool, id: Uuid) -> DbResult<Option<RegisterEntry>> {
    let entry = sqlx::query_as::<_, RegisterEntry>(&format!(
        "SELECT {} FROM register_entries WHERE id = $1",
        ENTRY_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(entry)
}

/// Retrieves an entry by kind and slug, for the public read view.
pub async fn find_entry_by_slug(
    pool: &PgPool,
    kind: EntryKind,
    slug: &str,
) -> DbResult<Option<RegisterEntry>> {
    let entry = sqlx::query_as::<_, RegisterEntry>(&format!(
        "SELECT {} FROM register_entries WHERE kind = $1 AND slug = $2",
        ENTRY_COLUMNS
    ))
    .bind(kind)
    .bind(slug)
    .fetch_optional(pool)
    .await?;

    Ok(entry)
}

/// Retrieves an entry by id and row-locks it for the enclosing transaction.
///
/// Lifecycle operations lock the parent entry before touching its versions
/// so concurrent publish/archive calls for the same entry serialize.
pub async fn lock_entry(conn: &mut PgConnection, id: Uuid) -> DbResult<Option<RegisterEntry>> {
    let entry = sqlx::query_as::<_, RegisterEntry>(&format!(
        "SELECT {} FROM register_entries WHERE id = $1 FOR UPDATE",
        ENTRY_COLUMNS
    ))
    .bind(id)
    .fetch_optional(conn)
    .await?;

    Ok(entry)
}

/// Lists entries, optionally filtered by kind, newest first.
pub async fn list_entries(
    pool: &PgPool,
    kind: Option<EntryKind>,
    pagination: Pagination,
) -> DbResult<Vec<RegisterEntry>> {
    let entries = sqlx::query_as::<_, RegisterEntry>(&format!(
        r#"
        SELECT {}
        FROM register_entries
        WHERE ($1::entry_kind IS NULL OR kind = $1::entry_kind)
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#,
        ENTRY_COLUMNS
    ))
    .bind(kind)
    .bind(pagination.limit)
    .bind(pagination.offset)
    .fetch_all(pool)
    .await?;

    Ok(entries)
}

/// Counts entries, optionally filtered by kind.
pub async fn count_entries(pool: &PgPool, kind: Option<EntryKind>) -> DbResult<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM register_entries WHERE ($1::entry_kind IS NULL OR kind = $1::entry_kind)",
    )
    .bind(kind)
    .fetch_one(pool)
    .await?;

    Ok(count)
}

/// Whether a slug is already taken among entries of the same kind.
pub async fn slug_exists(pool: &PgPool, kind: EntryKind, slug: &str) -> DbResult<bool> {
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM register_entries WHERE kind = $1 AND slug = $2)",
    )
    .bind(kind)
    .bind(slug)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

/// Sets an entry's slug if it does not already have one.
///
/// A slug is assigned exactly once outside of rename; when another caller
/// won the race the existing row is returned unchanged.
pub async fn set_slug_if_absent(pool: &PgPool, id: Uuid, slug: &str) -> DbResult<RegisterEntry> {
    let updated = sqlx::query_as::<_, RegisterEntry>(&format!(
        r#"
        UPDATE register_entries
        SET slug = $2, updated_at = now()
        WHERE id = $1 AND slug IS NULL
        RETURNING {}
        "#,
        ENTRY_COLUMNS
    ))
    .bind(id)
    .bind(slug)
    .fetch_optional(pool)
    .await?;

    match updated {
        Some(entry) => {
            tracing::info!(entry_id = %id, slug = %slug, "Assigned slug");
            Ok(entry)
        },
        None => {
            let existing = find_entry(pool, id)
                .await?
                .ok_or_else(|| super::DbError::not_found("Register entry", id))?;
            Ok(existing)
        },
    }
}

/// Renames an entry, replacing name and slug in one statement.
///
/// Pass `slug = None` for an entry that has never been published; its slug
/// stays NULL until the first publish assigns one.
pub async fn rename_entry(
    pool: &PgPool,
    id: Uuid,
    name: &str,
    slug: Option<&str>,
) -> DbResult<RegisterEntry> {
    let entry = sqlx::query_as::<_, RegisterEntry>(&format!(
        r#"
        UPDATE register_entries
        SET name = $2, slug = $3, updated_at = now()
        WHERE id = $1
        RETURNING {}
        "#,
        ENTRY_COLUMNS
    ))
    .bind(id)
    .bind(name)
    .bind(slug)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| super::DbError::not_found("Register entry", id))?;

    tracing::info!(entry_id = %id, name = %name, slug = ?slug, "Renamed register entry");

    Ok(entry)
}
