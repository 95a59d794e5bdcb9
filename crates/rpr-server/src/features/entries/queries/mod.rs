pub mod get;
pub mod list;

pub use get::{GetEntryError, GetEntryQuery, GetEntryResponse, VersionSummary};
pub use list::{EntryListItem, ListEntriesError, ListEntriesQuery, ListEntriesResponse};
