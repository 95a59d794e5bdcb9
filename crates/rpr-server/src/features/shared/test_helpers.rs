//! Test fixtures and fakes
//!
//! Builders for seeding register entries and versions, plus in-memory
//! search index fakes used by the lifecycle handler tests.

use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

use crate::models::{EntryKind, EntryVersion, RegisterEntry, VersionSnapshot, VersionStatus};
use crate::search::{SearchDocument, SearchError, SearchIndex, SearchResult};

/// Builder for seeding register entries
#[derive(Debug, Clone)]
pub struct TestEntry {
    pub kind: EntryKind,
    pub name: String,
    pub slug: Option<String>,
}

impl TestEntry {
    pub fn new(kind: EntryKind, name: &str) -> Self {
        Self {
            kind,
            name: name.to_string(),
            slug: None,
        }
    }

    pub fn with_slug(mut self, slug: &str) -> Self {
        self.slug = Some(slug.to_string());
        self
    }

    pub async fn insert(self, pool: &PgPool) -> RegisterEntry {
        sqlx::query_as::<_, RegisterEntry>(
            r#"
            INSERT INTO register_entries (kind, name, slug)
            VALUES ($1, $2, $3)
            RETURNING id, kind, name, slug, created_at, updated_at
            "#,
        )
        .bind(self.kind)
        .bind(&self.name)
        .bind(&self.slug)
        .fetch_one(pool)
        .await
        .unwrap()
    }
}

/// Builder for seeding entry versions
#[derive(Debug, Clone)]
pub struct TestVersion {
    pub entry_id: Uuid,
    pub status: VersionStatus,
    pub snapshot: VersionSnapshot,
    pub created_by: Option<String>,
}

impl TestVersion {
    pub fn new(entry_id: Uuid) -> Self {
        Self {
            entry_id,
            status: VersionStatus::Draft,
            snapshot: VersionSnapshot::default(),
            created_by: None,
        }
    }

    pub fn with_status(mut self, status: VersionStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_summary(mut self, summary: &str) -> Self {
        self.snapshot.summary = Some(summary.to_string());
        self
    }

    pub fn with_created_by(mut self, editor: &str) -> Self {
        self.created_by = Some(editor.to_string());
        self
    }

    pub async fn insert(self, pool: &PgPool) -> EntryVersion {
        let new = crate::db::versions::NewVersion {
            entry_id: self.entry_id,
            status: self.status,
            snapshot: self.snapshot,
            created_by: self.created_by,
        };
        crate::db::versions::create_version(pool, &new).await.unwrap()
    }
}

/// In-memory search index that records every document it holds
#[derive(Default)]
pub struct RecordingIndex {
    documents: Mutex<HashMap<String, HashMap<Uuid, SearchDocument>>>,
}

impl RecordingIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, index: &str, id: Uuid) -> bool {
        self.documents
            .lock()
            .unwrap()
            .get(index)
            .is_some_and(|docs| docs.contains_key(&id))
    }

    pub fn ids(&self, index: &str) -> Vec<Uuid> {
        self.documents
            .lock()
            .unwrap()
            .get(index)
            .map(|docs| docs.keys().copied().collect())
            .unwrap_or_default()
    }

    pub fn document(&self, index: &str, id: Uuid) -> Option<SearchDocument> {
        self.documents
            .lock()
            .unwrap()
            .get(index)
            .and_then(|docs| docs.get(&id).cloned())
    }
}

#[async_trait]
impl SearchIndex for RecordingIndex {
    fn environment(&self) -> &str {
        "test"
    }

    async fn upsert(&self, index: &str, id: Uuid, document: &SearchDocument) -> SearchResult<()> {
        self.documents
            .lock()
            .unwrap()
            .entry(index.to_string())
            .or_default()
            .insert(id, document.clone());
        Ok(())
    }

    async fn delete(&self, index: &str, id: Uuid) -> SearchResult<()> {
        if let Some(docs) = self.documents.lock().unwrap().get_mut(index) {
            docs.remove(&id);
        }
        Ok(())
    }

    async fn bulk_delete(&self, index: &str, ids: &[Uuid]) -> SearchResult<()> {
        if let Some(docs) = self.documents.lock().unwrap().get_mut(index) {
            for id in ids {
                docs.remove(id);
            }
        }
        Ok(())
    }

    async fn delete_index(&self, index: &str) -> SearchResult<()> {
        self.documents.lock().unwrap().remove(index);
        Ok(())
    }
}

/// Search index that rejects every operation, for rollback tests
#[derive(Default)]
pub struct FailingIndex;

impl FailingIndex {
    fn rejected(operation: &'static str, index: &str) -> SearchError {
        SearchError::Rejected {
            operation,
            index: index.to_string(),
            status: 503,
        }
    }
}

#[async_trait]
impl SearchIndex for FailingIndex {
    fn environment(&self) -> &str {
        "test"
    }

    async fn upsert(&self, index: &str, _id: Uuid, _document: &SearchDocument) -> SearchResult<()> {
        Err(Self::rejected("upsert", index))
    }

    async fn delete(&self, index: &str, _id: Uuid) -> SearchResult<()> {
        Err(Self::rejected("delete", index))
    }

    async fn bulk_delete(&self, index: &str, _ids: &[Uuid]) -> SearchResult<()> {
        Err(Self::rejected("bulk_delete", index))
    }

    async fn delete_index(&self, index: &str) -> SearchResult<()> {
        Err(Self::rejected("delete_index", index))
    }
}
