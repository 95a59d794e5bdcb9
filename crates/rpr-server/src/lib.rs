//! RPR Server Library
//!
//! HTTP server for the register of regulated professions and their
//! regulatory bodies.
//!
//! # Overview
//!
//! Administrators create, edit, publish and archive versioned records;
//! the public read view shows only each record's live version, and a
//! full-text search index is kept in step with the relational store.
//!
//! - **API Endpoints**: REST API for entry and version management
//! - **Database**: PostgreSQL via SQLx, one transaction per lifecycle
//!   operation with row locks on the parent entry
//! - **Search**: external full-text engine, updated inside the lifecycle
//!   unit of work (index call before commit, rollback on index failure)
//! - **Configuration**: environment-based configuration management
//!
//! # Architecture
//!
//! Features follow a CQRS layout: each vertical slice owns its commands,
//! queries, and routes. Commands are plain data; handlers are standalone
//! async functions with the business logic.
//!
//! The engineering core is the version lifecycle in
//! [`features::versions`]: at most one version of an entry is ever live,
//! publishing demotes the previous live version to archived, and
//! archiving a draft restores the live version to draft instead.
//!
//! # Example
//!
//! ```no_run
//! use rpr_server::{api, config::Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     api::serve(config).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod db;
pub mod features;
pub mod middleware;
pub mod models;
pub mod search;
