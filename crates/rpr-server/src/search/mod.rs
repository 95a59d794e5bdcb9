//! Search index synchronization.
//!
//! The register keeps an external full-text index in step with the
//! relational store: the lifecycle handlers upsert a document when a
//! version goes live and remove documents when versions are demoted or
//! archived. The engine has no shared transaction with Postgres, so the
//! handlers issue index calls before committing and treat any index
//! failure as cause to roll back the relational transaction.
//!
//! Index names are derived from the entry kind and the configured
//! deployment environment (`professions_dev`, `organisations_prod`, ...)
//! rather than read from ambient process state.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{EntryKind, EntryVersion, RegisterEntry};

pub mod http;

pub use http::HttpSearchIndex;

/// Search operation errors
#[derive(Error, Debug)]
pub enum SearchError {
    /// Transport-level failure talking to the engine
    #[error("Search request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The engine answered with a non-success status
    #[error("Search engine rejected {operation} on index '{index}' with status {status}")]
    Rejected {
        operation: &'static str,
        index: String,
        status: u16,
    },
}

pub type SearchResult<T> = Result<T, SearchError>;

/// The searchable subset of a live version, keyed by version id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchDocument {
    pub entry_id: Uuid,
    pub kind: EntryKind,
    pub name: String,
    pub slug: Option<String>,
    pub summary: Option<String>,
    pub alternate_name: Option<String>,
}

impl SearchDocument {
    /// Builds the document for a version of the given entry.
    pub fn for_version(entry: &RegisterEntry, version: &EntryVersion) -> Self {
        Self {
            entry_id: entry.id,
            kind: entry.kind,
            name: entry.name.clone(),
            slug: entry.slug.clone(),
            summary: version.snapshot.summary.clone(),
            alternate_name: version.snapshot.alternate_name.clone(),
        }
    }
}

/// Derives the index name for an entry kind in a deployment environment.
pub fn index_name(kind: EntryKind, environment: &str) -> String {
    format!("{}_{}", kind.plural(), environment)
}

/// Client contract for the external full-text engine.
///
/// All operations are idempotent: deleting a document or index that does
/// not exist succeeds. The lifecycle handlers rely on that when replaying
/// an operation after a rolled-back attempt.
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// The deployment environment this client writes to, used with
    /// [`index_name`] to scope operations per entry kind.
    fn environment(&self) -> &str;

    /// Creates or replaces a document, keyed by version id.
    async fn upsert(&self, index: &str, id: Uuid, document: &SearchDocument) -> SearchResult<()>;

    /// Removes a single document.
    async fn delete(&self, index: &str, id: Uuid) -> SearchResult<()>;

    /// Removes a batch of documents by id.
    async fn bulk_delete(&self, index: &str, ids: &[Uuid]) -> SearchResult<()>;

    /// Drops an entire index.
    async fn delete_index(&self, index: &str) -> SearchResult<()>;
}
