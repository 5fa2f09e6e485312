//! Asset model shared by the repository and both engines
//!
//! Skills and rules have near-identical shapes; the differences (directory vs
//! file, link vs copy deployment) are carried as data on [`AssetKind`] rather
//! than as two parallel type hierarchies.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The two asset families shelf manages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    /// Directory containing a `SKILL.md` manifest
    Skill,
    /// Single markdown file with an optional metadata block
    Rule,
}

impl AssetKind {
    /// Filesystem entry name for an asset id (`<id>` or `<id>.md`)
    pub fn entry_name(&self, id: &str) -> String {
        match self {
            AssetKind::Skill => id.to_string(),
            AssetKind::Rule => format!("{id}.md"),
        }
    }

    /// Whether assets of this kind are directory trees
    pub fn is_directory(&self) -> bool {
        matches!(self, AssetKind::Skill)
    }

    /// Whether deployment materializes a link rather than a copy
    ///
    /// Skills stay linked to the library so they track live edits; rules are
    /// copied because they are edited independently once deployed.
    pub fn deploys_as_link(&self) -> bool {
        matches!(self, AssetKind::Skill)
    }

    pub fn label(&self) -> &'static str {
        match self {
            AssetKind::Skill => "skill",
            AssetKind::Rule => "rule",
        }
    }
}

/// Drift status of a workspace asset relative to the library and the baseline
///
/// A pure function of the (local, library, baseline) fingerprint triple; see
/// [`crate::classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    /// No library counterpart exists
    New,
    /// Local and library fingerprints are equal
    Synced,
    /// Working copy changed since baseline, library unchanged
    LocalAhead,
    /// Library changed since baseline, working copy unchanged
    RemoteAhead,
    /// Both sides diverged from the baseline
    Conflict,
}

impl SyncStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStatus::New => "new",
            SyncStatus::Synced => "synced",
            SyncStatus::LocalAhead => "local_ahead",
            SyncStatus::RemoteAhead => "remote_ahead",
            SyncStatus::Conflict => "conflict",
        }
    }
}

/// A skill or rule, as discovered by a scan of either root
#[derive(Debug, Clone, Serialize)]
pub struct Asset {
    /// Join key between library-side and workspace-side instances: the
    /// directory name for skills, the lower-cased filename stem for rules
    pub id: String,
    pub kind: AssetKind,
    pub name: String,
    pub description: String,
    /// Where this instance actually lives on disk
    pub location: PathBuf,
    /// Drift status, populated only by drift-aware listings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<SyncStatus>,
    /// Human-readable explanation of `status`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sync_hint: Option<String>,
}

impl Asset {
    pub fn new(
        id: impl Into<String>,
        kind: AssetKind,
        name: impl Into<String>,
        description: impl Into<String>,
        location: PathBuf,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            name: name.into(),
            description: description.into(),
            location,
            status: None,
            sync_hint: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_name_per_kind() {
        assert_eq!(AssetKind::Skill.entry_name("refactor"), "refactor");
        assert_eq!(AssetKind::Rule.entry_name("style"), "style.md");
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let s = serde_json::to_string(&SyncStatus::LocalAhead).unwrap();
        assert_eq!(s, "\"local_ahead\"");
        assert_eq!(SyncStatus::RemoteAhead.as_str(), "remote_ahead");
    }
}
