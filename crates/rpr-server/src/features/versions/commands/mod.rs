pub mod archive;
pub mod confirm;
pub mod create_draft;
pub mod publish;
pub mod update_draft;

pub use archive::{ArchiveVersionCommand, ArchiveVersionError, ArchiveVersionResponse};
pub use confirm::{ConfirmVersionCommand, ConfirmVersionError, ConfirmVersionResponse};
pub use create_draft::{CreateDraftCommand, CreateDraftError, CreateDraftResponse};
pub use publish::{PublishVersionCommand, PublishVersionError, PublishVersionResponse};
pub use update_draft::{UpdateDraftCommand, UpdateDraftError, UpdateDraftResponse};
