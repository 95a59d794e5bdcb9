pub mod get;
pub mod list;

pub use get::{GetVersionError, GetVersionQuery, GetVersionResponse};
pub use list::{ListVersionsError, ListVersionsQuery, ListVersionsResponse, VersionListItem};
