//! Register entries feature: the parent records of the register.
//!
//! Covers entry creation and listing, the administrative rename
//! operation, and slug assignment. Slugs are owned here; the versions
//! feature calls [`slug::assign_slug`] after a first publish commits.

pub mod commands;
pub mod queries;
pub mod routes;
pub mod slug;

pub use commands::{
    CreateEntryCommand, CreateEntryError, CreateEntryResponse, RenameEntryCommand,
    RenameEntryError, RenameEntryResponse,
};

pub use queries::{
    EntryListItem, GetEntryError, GetEntryQuery, GetEntryResponse, ListEntriesError,
    ListEntriesQuery, ListEntriesResponse, VersionSummary,
};

pub use routes::entries_routes;
