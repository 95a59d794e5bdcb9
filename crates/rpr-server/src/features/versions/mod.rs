//! Version lifecycle feature: the publication state machine.
//!
//! A version moves `unconfirmed -> draft -> {live, archived}`. Publishing
//! demotes the previous live version to archived; archiving a draft
//! demotes the live version to draft instead, restoring it to an editable
//! state. Publish and archive keep the search index in step with the
//! relational store inside a single unit of work.

pub mod commands;
pub mod derive;
pub mod queries;
pub mod routes;

pub use commands::{
    ArchiveVersionCommand, ArchiveVersionError, ArchiveVersionResponse, ConfirmVersionCommand,
    ConfirmVersionError, ConfirmVersionResponse, CreateDraftCommand, CreateDraftError,
    CreateDraftResponse, PublishVersionCommand, PublishVersionError, PublishVersionResponse,
    UpdateDraftCommand, UpdateDraftError, UpdateDraftResponse,
};

pub use queries::{
    GetVersionError, GetVersionQuery, GetVersionResponse, ListVersionsError, ListVersionsQuery,
    ListVersionsResponse, VersionListItem,
};

pub use routes::versions_routes;
