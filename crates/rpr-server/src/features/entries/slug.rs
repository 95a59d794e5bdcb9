//! Slug assignment for register entries.
//!
//! Slugs are generated, never accepted as input. An entry gets its slug
//! when its first version is published; renaming a published entry
//! re-slugifies through the same collision probe.

use sqlx::PgPool;

use crate::db::{entries, DbResult};
use crate::models::{EntryKind, RegisterEntry};

/// Maximum length of a generated slug, before any collision suffix.
pub const MAX_SLUG_LENGTH: usize = 80;

/// Derives a URL-safe slug from an entry name.
///
/// Lowercases, turns whitespace runs into single hyphens, strips every
/// other non-alphanumeric character, and truncates to [`MAX_SLUG_LENGTH`].
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else if c.is_whitespace() || c == '-' {
            pending_hyphen = true;
        }
    }

    slug.truncate(MAX_SLUG_LENGTH);
    while slug.ends_with('-') {
        slug.pop();
    }

    slug
}

/// Finds a slug for `name` that is unused among entries of `kind`.
///
/// Probes `slug`, `slug-1`, `slug-2`, ... until a free one turns up. The
/// unique index on (kind, slug) remains the backstop for races.
pub async fn resolve_unique_slug(
    pool: &PgPool,
    kind: EntryKind,
    name: &str,
) -> DbResult<String> {
    let mut base = slugify(name);
    if base.is_empty() {
        base = kind.as_str().to_string();
    }

    let mut candidate = base.clone();
    let mut suffix = 1;
    while entries::slug_exists(pool, kind, &candidate).await? {
        candidate = format!("{}-{}", base, suffix);
        suffix += 1;
    }

    Ok(candidate)
}

/// Gives an entry a slug derived from its name, unless it already has one.
///
/// Called after a publish commits, which is why it runs against the pool
/// rather than inside the version transaction: the operation is
/// idempotent and scoped to the entry, not the version.
pub async fn assign_slug(pool: &PgPool, entry: &RegisterEntry) -> DbResult<RegisterEntry> {
    if entry.slug.is_some() {
        tracing::debug!(entry_id = %entry.id, "Entry already has a slug");
        return Ok(entry.clone());
    }

    let slug = resolve_unique_slug(pool, entry.kind, &entry.name).await?;
    entries::set_slug_if_absent(pool, entry.id, &slug).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::TestEntry;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Farrier"), "farrier");
        assert_eq!(slugify("Chartered Surveyor"), "chartered-surveyor");
        assert_eq!(slugify("  Social  Worker  "), "social-worker");
    }

    #[test]
    fn test_slugify_strips_punctuation() {
        assert_eq!(slugify("Nurse (Adult)"), "nurse-adult");
        assert_eq!(slugify("Solicitor & Notary"), "solicitor-notary");
        assert_eq!(slugify("Architect's Assistant"), "architects-assistant");
    }

    #[test]
    fn test_slugify_keeps_existing_hyphens() {
        assert_eq!(slugify("Speech-Language Therapist"), "speech-language-therapist");
    }

    #[test]
    fn test_slugify_truncates() {
        let long = "a ".repeat(100);
        let slug = slugify(&long);
        assert!(slug.len() <= MAX_SLUG_LENGTH);
        assert!(!slug.ends_with('-'));
    }

    #[test]
    fn test_slugify_empty_for_symbols_only() {
        assert_eq!(slugify("!!!"), "");
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_resolve_unique_slug_appends_suffix(pool: PgPool) {
        TestEntry::new(EntryKind::Profession, "Pharmacist")
            .with_slug("pharmacist")
            .insert(&pool)
            .await;
        TestEntry::new(EntryKind::Profession, "Pharmacist")
            .with_slug("pharmacist-1")
            .insert(&pool)
            .await;

        let slug = resolve_unique_slug(&pool, EntryKind::Profession, "Pharmacist")
            .await
            .unwrap();
        assert_eq!(slug, "pharmacist-2");
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_resolve_unique_slug_ignores_other_kind(pool: PgPool) {
        TestEntry::new(EntryKind::Organisation, "Pharmacist")
            .with_slug("pharmacist")
            .insert(&pool)
            .await;

        let slug = resolve_unique_slug(&pool, EntryKind::Profession, "Pharmacist")
            .await
            .unwrap();
        assert_eq!(slug, "pharmacist");
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_assign_slug_is_a_noop_when_present(pool: PgPool) {
        let entry = TestEntry::new(EntryKind::Profession, "Pharmacist")
            .with_slug("pharmacist")
            .insert(&pool)
            .await;

        let unchanged = assign_slug(&pool, &entry).await.unwrap();
        assert_eq!(unchanged.slug.as_deref(), Some("pharmacist"));

        let again = assign_slug(&pool, &unchanged).await.unwrap();
        assert_eq!(again.slug.as_deref(), Some("pharmacist"));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_assign_slug_falls_back_for_symbol_names(pool: PgPool) {
        let entry = TestEntry::new(EntryKind::Profession, "???").insert(&pool).await;

        let updated = assign_slug(&pool, &entry).await.unwrap();
        assert_eq!(updated.slug.as_deref(), Some("profession"));
    }
}
