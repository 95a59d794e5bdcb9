//! Feature modules implementing the register API
//!
//! Each feature is a vertical slice with its own commands, queries, and
//! routes, following CQRS conventions:
//!
//! - **entries**: Register entries (professions and regulatory bodies),
//!   including the administrative rename operation and slug assignment
//! - **versions**: The version lifecycle (draft, confirm, publish,
//!   archive) and search index synchronization
//!
//! Commands and queries are plain data structures; handlers are
//! standalone async functions carrying the business logic, called
//! directly from the route layer.

pub mod entries;
pub mod shared;
pub mod versions;

use axum::Router;
use std::sync::Arc;

use crate::search::SearchIndex;

/// Shared state for feature routes
#[derive(Clone)]
pub struct FeatureState {
    /// PostgreSQL connection pool
    pub db: sqlx::PgPool,
    /// Full-text search index client
    pub search: Arc<dyn SearchIndex>,
}

/// Creates the main API router with all feature routes mounted
///
/// - `/entries` - register entry management
/// - `/versions` - version lifecycle operations
pub fn router(state: FeatureState) -> Router<()> {
    Router::new()
        .nest("/entries", entries::entries_routes().with_state(state.db.clone()))
        .nest("/versions", versions::versions_routes().with_state(state))
}
