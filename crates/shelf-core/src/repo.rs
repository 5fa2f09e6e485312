//! Asset repository
//!
//! Owns the cached library listings and scans the workspace on demand. All
//! refreshes — user-initiated or triggered by an external change notification
//! — go through [`AssetRepository::refresh`], which rescans the library and
//! emits one change event to every subscriber once the scan completes.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender};

use tracing::debug;

use crate::asset::{Asset, AssetKind, SyncStatus};
use crate::baseline::BaselineStore;
use crate::classify::classify;
use crate::hash::asset_fingerprint;
use crate::metadata::{parse_rule_doc, parse_skill_manifest};
use crate::paths;

/// Emitted to subscribers after each completed refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepoChanged;

/// Repository over one library root and one workspace root
#[derive(Debug)]
pub struct AssetRepository {
    library_root: PathBuf,
    workspace_root: PathBuf,
    skills: Vec<Asset>,
    rules: Vec<Asset>,
    subscribers: Vec<Sender<RepoChanged>>,
}

impl AssetRepository {
    /// Create a repository with empty caches; call [`refresh`] to populate
    ///
    /// [`refresh`]: AssetRepository::refresh
    pub fn new(library_root: impl Into<PathBuf>, workspace_root: impl Into<PathBuf>) -> Self {
        Self {
            library_root: library_root.into(),
            workspace_root: workspace_root.into(),
            skills: Vec::new(),
            rules: Vec::new(),
            subscribers: Vec::new(),
        }
    }

    /// Create and immediately scan
    pub fn open(library_root: impl Into<PathBuf>, workspace_root: impl Into<PathBuf>) -> Self {
        let mut repo = Self::new(library_root, workspace_root);
        repo.refresh();
        repo
    }

    pub fn library_root(&self) -> &Path {
        &self.library_root
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    /// Subscribe to change notifications; the receiver sees one event per
    /// completed refresh
    pub fn subscribe(&mut self) -> Receiver<RepoChanged> {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        rx
    }

    /// Rescan the library and notify subscribers
    pub fn refresh(&mut self) {
        self.skills = scan_root(&self.library_root, AssetKind::Skill);
        self.rules = scan_root(&self.library_root, AssetKind::Rule);
        debug!(
            "Library scan: {} skills, {} rules under {:?}",
            self.skills.len(),
            self.rules.len(),
            self.library_root
        );

        self.subscribers.retain(|tx| tx.send(RepoChanged).is_ok());
    }

    /// All assets of a kind under the library root (cached from last refresh)
    pub fn list_library(&self, kind: AssetKind) -> &[Asset] {
        match kind {
            AssetKind::Skill => &self.skills,
            AssetKind::Rule => &self.rules,
        }
    }

    /// Library asset by id, if present
    pub fn library_asset(&self, kind: AssetKind, id: &str) -> Option<&Asset> {
        self.list_library(kind).iter().find(|a| a.id == id)
    }

    /// Assets of a kind present under the workspace root: existence only, no
    /// drift annotation
    pub fn list_deployed(&self, kind: AssetKind) -> Vec<Asset> {
        scan_root(&self.workspace_root, kind)
    }

    /// Workspace assets annotated with drift status, with `synced` entries
    /// filtered out — only actionable drift is surfaced
    pub fn list_working_only(&self, kind: AssetKind) -> Vec<Asset> {
        let baseline = BaselineStore::load(&self.workspace_root);

        let mut drifted = Vec::new();
        for mut asset in scan_root(&self.workspace_root, kind) {
            let local_fp = asset_fingerprint(&asset.location, kind);
            let library_fp = self
                .library_asset(kind, &asset.id)
                .map(|lib| asset_fingerprint(&lib.location, kind))
                .unwrap_or_default();
            let baseline_fp = baseline.fingerprint(kind, &asset.id);

            let drift = classify(&local_fp, &library_fp, baseline_fp);
            if drift.status == SyncStatus::Synced {
                continue;
            }
            asset.status = Some(drift.status);
            asset.sync_hint = Some(drift.hint.to_string());
            drifted.push(asset);
        }
        drifted
    }
}

/// Scan one root for assets of a kind
///
/// Rules merge the legacy namespace directory (read-only), deduplicated by
/// id with the current namespace winning.
fn scan_root(root: &Path, kind: AssetKind) -> Vec<Asset> {
    let mut assets = match kind {
        AssetKind::Skill => scan_skills(&paths::skills_dir(root)),
        AssetKind::Rule => {
            let mut rules = scan_rules(&paths::rules_dir(root));
            for legacy in scan_rules(&paths::legacy_rules_dir(root)) {
                if !rules.iter().any(|r| r.id == legacy.id) {
                    rules.push(legacy);
                }
            }
            rules
        }
    };
    assets.sort_by(|a, b| a.id.cmp(&b.id));
    assets
}

/// Skills are subdirectories containing a `SKILL.md`; the directory name is
/// the id. Symlinked directories count, so deployed links are seen.
fn scan_skills(dir: &Path) -> Vec<Asset> {
    let mut skills = Vec::new();

    let Ok(entries) = fs::read_dir(dir) else {
        return skills;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let manifest = path.join(paths::SKILL_MANIFEST);
        if !manifest.is_file() {
            continue;
        }

        let id = entry.file_name().to_string_lossy().into_owned();
        match fs::read_to_string(&manifest) {
            Ok(content) => {
                let meta = parse_skill_manifest(&content, &id);
                skills.push(Asset::new(id, AssetKind::Skill, meta.name, meta.description, path));
            }
            Err(e) => {
                debug!("Failed to read manifest in {:?}: {}", path, e);
            }
        }
    }

    skills
}

/// Rules are `.md` files; the lower-cased filename stem is the id
fn scan_rules(dir: &Path) -> Vec<Asset> {
    let mut rules = Vec::new();

    let Ok(entries) = fs::read_dir(dir) else {
        return rules;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() || path.extension().is_none_or(|ext| ext != "md") {
            continue;
        }

        let Some(stem) = path.file_stem().map(|s| s.to_string_lossy().to_lowercase()) else {
            continue;
        };
        match fs::read_to_string(&path) {
            Ok(content) => {
                let meta = parse_rule_doc(&content, &stem);
                rules.push(Asset::new(stem, AssetKind::Rule, meta.name, meta.description, path));
            }
            Err(e) => {
                debug!("Failed to read rule {:?}: {}", path, e);
            }
        }
    }

    rules
}
