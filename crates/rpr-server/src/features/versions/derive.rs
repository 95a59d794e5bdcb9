//! Copy-on-write derivation of new drafts.

use uuid::Uuid;

use crate::db::versions::NewVersion;
use crate::models::{EntryVersion, VersionStatus};

/// Derives the next version of an entry from its most recent version.
///
/// Deep-copies the previous snapshot and clears everything else:
/// identity, timestamps and status are never carried over, so the new
/// version always starts its own lifecycle as unconfirmed. An entry with
/// no versions yet gets an empty snapshot.
pub fn derive_next_version(
    entry_id: Uuid,
    previous: Option<&EntryVersion>,
    created_by: Option<String>,
) -> NewVersion {
    NewVersion {
        entry_id,
        status: VersionStatus::Unconfirmed,
        snapshot: previous.map(|v| v.snapshot.clone()).unwrap_or_default(),
        created_by,
    }
}
