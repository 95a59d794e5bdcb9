//! RPR Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, utilities, and error handling for the Regulated Professions
//! Register workspace.
//!
//! # Overview
//!
//! This crate provides common functionality used across all RPR workspace
//! members:
//!
//! - **Logging**: Centralized tracing subscriber configuration
//! - **Types**: Shared domain types and data structures
//!
//! # Example
//!
//! ```no_run
//! use rpr_common::logging::{init_logging, LogConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = LogConfig::from_env()?;
//!     init_logging(&config)?;
//!     Ok(())
//! }
//! ```

pub mod logging;
pub mod types;
