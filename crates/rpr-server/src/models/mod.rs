//! Database models for register entries and their versions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Kind of a register entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "entry_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Profession,
    Organisation,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Profession => "profession",
            EntryKind::Organisation => "organisation",
        }
    }

    /// Plural form, used to derive search index names
    pub fn plural(&self) -> &'static str {
        match self {
            EntryKind::Profession => "professions",
            EntryKind::Organisation => "organisations",
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EntryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "profession" => Ok(EntryKind::Profession),
            "organisation" => Ok(EntryKind::Organisation),
            other => Err(format!("Unknown entry kind: {}", other)),
        }
    }
}

/// Lifecycle status of an entry version
///
/// Per entry at most one version is ever `Live`. A version starts as
/// `Unconfirmed`, is confirmed into `Draft`, and from there is either
/// published (`Live`) or withdrawn (`Archived`). A `Live` version only
/// changes status when another version of the same entry is published
/// (demoting it to `Archived`) or archived (demoting it to `Draft`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "version_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum VersionStatus {
    Unconfirmed,
    Draft,
    Live,
    Archived,
}

impl VersionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VersionStatus::Unconfirmed => "unconfirmed",
            VersionStatus::Draft => "draft",
            VersionStatus::Live => "live",
            VersionStatus::Archived => "archived",
        }
    }

    /// Whether `confirm` accepts a version in this status
    pub fn can_confirm(self) -> bool {
        matches!(self, VersionStatus::Unconfirmed | VersionStatus::Draft)
    }

    /// Whether `publish` accepts a version in this status
    ///
    /// Re-publishing the live version is allowed; it refreshes the
    /// search index without demoting anything.
    pub fn can_publish(self) -> bool {
        matches!(self, VersionStatus::Draft | VersionStatus::Live)
    }

    /// Whether `archive` accepts a version in this status
    ///
    /// The live version cannot be archived directly; it is only demoted
    /// through another version's publish or archive.
    pub fn can_archive(self) -> bool {
        matches!(self, VersionStatus::Unconfirmed | VersionStatus::Draft)
    }
}

impl std::fmt::Display for VersionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A register entry: a regulated profession or a regulatory body
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RegisterEntry {
    pub id: Uuid,
    pub kind: EntryKind,
    pub name: String,
    /// NULL until the entry's first version is published
    pub slug: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The editable fields captured by a version
///
/// Profession versions use the regulation/qualification fields,
/// organisation versions the contact fields. All fields are optional so
/// a freshly created entry can start from an empty draft.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct VersionSnapshot {
    pub summary: Option<String>,
    pub alternate_name: Option<String>,
    pub regulation_summary: Option<String>,
    pub reserved_activities: Option<String>,
    pub legislation_name: Option<String>,
    pub legislation_url: Option<String>,
    pub qualification_summary: Option<String>,
    pub qualification_url: Option<String>,
    pub registration_requirements: Option<String>,
    pub registration_url: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_address: Option<String>,
}

/// A versioned snapshot of a register entry
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EntryVersion {
    pub id: Uuid,
    pub entry_id: Uuid,
    pub status: VersionStatus,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub snapshot: VersionSnapshot,
    /// Email of the acting editor, when known
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
