//! Persistent sync baseline
//!
//! One JSON document per workspace (`.agent/.sync_meta.json`) mapping asset
//! ids to the fingerprint and time recorded at the last successful deploy or
//! sync. The document is always rewritten whole; entries for assets that no
//! longer exist are harmless and left in place. An unparsable document is
//! treated as "no baseline recorded", never as a fatal error.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::asset::AssetKind;
use crate::hash::EMPTY_FINGERPRINT;
use crate::paths;

/// What was recorded at the last successful sync of one asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselineEntry {
    pub last_sync_hash: String,
    pub last_sync_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct BaselineDoc {
    #[serde(default)]
    skills: BTreeMap<String, BaselineEntry>,
    #[serde(default)]
    rules: BTreeMap<String, BaselineEntry>,
}

impl BaselineDoc {
    fn table(&self, kind: AssetKind) -> &BTreeMap<String, BaselineEntry> {
        match kind {
            AssetKind::Skill => &self.skills,
            AssetKind::Rule => &self.rules,
        }
    }

    fn table_mut(&mut self, kind: AssetKind) -> &mut BTreeMap<String, BaselineEntry> {
        match kind {
            AssetKind::Skill => &mut self.skills,
            AssetKind::Rule => &mut self.rules,
        }
    }
}

/// Baseline store bound to one workspace
#[derive(Debug)]
pub struct BaselineStore {
    path: PathBuf,
    doc: BaselineDoc,
}

impl BaselineStore {
    /// Load the baseline for a workspace; missing or corrupt files reset to
    /// an empty baseline
    pub fn load(workspace_root: &Path) -> Self {
        let path = paths::baseline_path(workspace_root);
        let doc = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(doc) => doc,
                Err(e) => {
                    warn!("Corrupt baseline at {:?}, resetting: {}", path, e);
                    BaselineDoc::default()
                }
            },
            Err(_) => BaselineDoc::default(),
        };
        Self { path, doc }
    }

    /// Baseline fingerprint for an asset; empty sentinel if never synced
    pub fn fingerprint(&self, kind: AssetKind, id: &str) -> &str {
        self.doc
            .table(kind)
            .get(id)
            .map(|e| e.last_sync_hash.as_str())
            .unwrap_or(EMPTY_FINGERPRINT)
    }

    /// Full baseline entry for an asset, if any
    pub fn entry(&self, kind: AssetKind, id: &str) -> Option<&BaselineEntry> {
        self.doc.table(kind).get(id)
    }

    /// Record a successful sync/deploy and persist immediately
    ///
    /// Callers must only invoke this after the transfer completed, so a
    /// failed transfer leaves the pre-attempt truth on disk.
    pub fn record(&mut self, kind: AssetKind, id: &str, fingerprint: &str) -> Result<()> {
        self.doc.table_mut(kind).insert(
            id.to_string(),
            BaselineEntry {
                last_sync_hash: fingerprint.to_string(),
                last_sync_time: Utc::now(),
            },
        );
        self.save()?;
        debug!("Recorded baseline for {} '{}'", kind.label(), id);
        Ok(())
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }
        let json = serde_json::to_string_pretty(&self.doc)?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write baseline {:?}", self.path))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_empty_baseline() {
        let temp = tempdir().unwrap();
        let store = BaselineStore::load(temp.path());
        assert_eq!(store.fingerprint(AssetKind::Skill, "x"), "");
        assert!(store.entry(AssetKind::Rule, "x").is_none());
    }

    #[test]
    fn test_record_survives_reload() {
        let temp = tempdir().unwrap();
        let mut store = BaselineStore::load(temp.path());
        store.record(AssetKind::Rule, "style", "abc123").unwrap();

        let reloaded = BaselineStore::load(temp.path());
        assert_eq!(reloaded.fingerprint(AssetKind::Rule, "style"), "abc123");
        assert!(reloaded.entry(AssetKind::Rule, "style").is_some());
        // Kind tables are independent
        assert_eq!(reloaded.fingerprint(AssetKind::Skill, "style"), "");
    }

    #[test]
    fn test_record_overwrites_not_merges() {
        let temp = tempdir().unwrap();
        let mut store = BaselineStore::load(temp.path());
        store.record(AssetKind::Skill, "a", "one").unwrap();
        store.record(AssetKind::Skill, "a", "two").unwrap();

        let reloaded = BaselineStore::load(temp.path());
        assert_eq!(reloaded.fingerprint(AssetKind::Skill, "a"), "two");
    }

    #[test]
    fn test_corrupt_file_resets_to_empty() {
        let temp = tempdir().unwrap();
        let path = paths::baseline_path(temp.path());
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{not json").unwrap();

        let store = BaselineStore::load(temp.path());
        assert_eq!(store.fingerprint(AssetKind::Skill, "x"), "");
    }

    #[test]
    fn test_wire_format_uses_camel_case() {
        let temp = tempdir().unwrap();
        let mut store = BaselineStore::load(temp.path());
        store.record(AssetKind::Rule, "style", "abc").unwrap();

        let raw = fs::read_to_string(paths::baseline_path(temp.path())).unwrap();
        assert!(raw.contains("\"lastSyncHash\""));
        assert!(raw.contains("\"lastSyncTime\""));
        assert!(raw.contains("\"rules\""));
    }
}
