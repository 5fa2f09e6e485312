//! Deployment engine
//!
//! Materializes library assets into the workspace for first use. Skills are
//! linked (junction/symlink) so the working copy tracks live library edits
//! until explicitly pulled down as a copy; rules are copied and normalized
//! because they are edited independently once deployed. Both paths record a
//! baseline. Removal deletes the workspace entry, with an elevated
//! confirmation when the workspace root aliases the library root — in that
//! configuration a removal destroys the canonical copy.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use tracing::info;

use crate::asset::{Asset, AssetKind};
use crate::baseline::BaselineStore;
use crate::fsutil::{remove_entry, same_entry};
use crate::hash::asset_fingerprint;
use crate::normalize::normalize_rule;
use crate::paths;
use crate::repo::AssetRepository;
use crate::sync::{ConfirmRequest, Confirmation, SyncOutcome};

/// Deployment engine bound to a repository and a confirmation capability
pub struct DeploymentEngine<'a> {
    repo: &'a mut AssetRepository,
    confirm: &'a dyn Confirmation,
}

impl<'a> DeploymentEngine<'a> {
    pub fn new(repo: &'a mut AssetRepository, confirm: &'a dyn Confirmation) -> Self {
        Self { repo, confirm }
    }

    /// Materialize a library asset into the workspace
    ///
    /// Link creation failures (e.g. missing privilege for junctions) are
    /// propagated, never swallowed: a silently failed deploy would leave the
    /// tree out of step with what listings claim is deployed.
    pub fn deploy(&mut self, asset: &Asset) -> Result<()> {
        let kind = asset.kind;
        let id = asset.id.as_str();
        if !asset.location.exists() {
            bail!("{} '{}' not found at {:?}", kind.label(), id, asset.location);
        }

        let target = paths::asset_path(self.repo.workspace_root(), kind, id);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }

        match kind {
            AssetKind::Skill => {
                if !same_entry(&asset.location, &target) {
                    remove_entry(&target)?;
                    link_dir(&asset.location, &target).with_context(|| {
                        format!("Failed to link {:?} into the workspace", asset.location)
                    })?;
                }
            }
            AssetKind::Rule => {
                let text = fs::read_to_string(&asset.location)
                    .with_context(|| format!("Failed to read {:?}", asset.location))?;
                fs::write(&target, normalize_rule(&text))
                    .with_context(|| format!("Failed to write {:?}", target))?;
            }
        }

        let fingerprint = asset_fingerprint(&target, kind);
        let mut baseline = BaselineStore::load(self.repo.workspace_root());
        baseline.record(kind, id, &fingerprint)?;
        info!("Deployed {} '{}' to {:?}", kind.label(), id, target);

        self.repo.refresh();
        Ok(())
    }

    /// Delete an asset's workspace entry
    ///
    /// Baseline entries are left behind on purpose; stale ones are harmless
    /// and a redeploy overwrites them.
    pub fn remove(&mut self, kind: AssetKind, id: &str) -> Result<SyncOutcome> {
        let target = self
            .find_workspace_entry(kind, id)
            .ok_or_else(|| anyhow!("{} '{}' is not deployed", kind.label(), id))?;

        if same_entry(self.repo.workspace_root(), self.repo.library_root()) {
            let request = ConfirmRequest::elevated(format!(
                "Workspace and library are the same directory: removing {} '{}' deletes the \
                 canonical library copy. Continue?",
                kind.label(),
                id
            ));
            if !self.confirm.confirm(&request) {
                info!("Removal of {} '{}' declined", kind.label(), id);
                return Ok(SyncOutcome::Declined);
            }
        }

        remove_entry(&target)?;
        info!("Removed {} '{}' from {:?}", kind.label(), id, target);

        self.repo.refresh();
        Ok(SyncOutcome::Completed)
    }

    /// Create a new skill skeleton in the library
    pub fn scaffold_skill(&mut self, name: &str, description: &str) -> Result<Asset> {
        let dir = paths::skills_dir(self.repo.library_root()).join(name);
        if dir.exists() {
            bail!("skill '{}' already exists in the library", name);
        }
        fs::create_dir_all(&dir).with_context(|| format!("Failed to create {:?}", dir))?;

        let manifest = format!(
            "---\nname: {name}\ndescription: {description}\n---\n\n# {name}\n\n[Describe the workflow here]\n"
        );
        fs::write(dir.join(paths::SKILL_MANIFEST), manifest)
            .with_context(|| format!("Failed to write manifest in {:?}", dir))?;
        info!("Scaffolded skill '{}' at {:?}", name, dir);

        self.repo.refresh();
        self.repo
            .library_asset(AssetKind::Skill, name)
            .cloned()
            .ok_or_else(|| anyhow!("scaffolded skill '{}' did not scan back", name))
    }

    /// Locate a deployed asset, checking the legacy rules directory too
    fn find_workspace_entry(&self, kind: AssetKind, id: &str) -> Option<std::path::PathBuf> {
        let canonical = paths::asset_path(self.repo.workspace_root(), kind, id);
        if canonical.exists() {
            return Some(canonical);
        }
        if kind == AssetKind::Rule {
            let legacy = paths::legacy_rules_dir(self.repo.workspace_root())
                .join(kind.entry_name(id));
            if legacy.exists() {
                return Some(legacy);
            }
        }
        None
    }
}

/// Platform-appropriate directory link
#[cfg(unix)]
fn link_dir(original: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(original, link)
}

/// Directory symlinks on Windows need either elevation or developer mode;
/// the resulting error must reach the user
#[cfg(windows)]
fn link_dir(original: &Path, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_dir(original, link)
}
