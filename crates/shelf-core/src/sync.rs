//! Bidirectional sync engine
//!
//! Moves one asset's content between the workspace and the library, gated by
//! the confirmation policy. Declining a confirmation is not an error: it is
//! the cancellation path, and it leaves the filesystem and the baseline
//! untouched. The baseline is only ever updated after the transfer completed.

use std::fs;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::asset::{Asset, AssetKind, SyncStatus};
use crate::baseline::BaselineStore;
use crate::classify::classify;
use crate::fsutil::{copy_dir_recursive, remove_entry, same_entry};
use crate::hash::asset_fingerprint;
use crate::normalize::normalize_rule;
use crate::paths;
use crate::repo::AssetRepository;

/// Transfer direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Workspace to library ("push")
    Up,
    /// Library to workspace ("pull")
    Down,
}

/// How strongly a confirmation prompt should be worded
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Routine operation, confirm to proceed
    Info,
    /// Proceeding discards content on one side
    Warning,
    /// Proceeding destroys the canonical copy
    Elevated,
}

/// A confirmation put to the user before a state-changing step
#[derive(Debug, Clone)]
pub struct ConfirmRequest {
    pub severity: Severity,
    pub message: String,
}

impl ConfirmRequest {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn elevated(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Elevated,
            message: message.into(),
        }
    }
}

/// Capability to ask the user for consent; the only suspension point in any
/// engine operation
///
/// The presentation layer supplies a real prompt; tests supply a stub.
pub trait Confirmation {
    fn confirm(&self, request: &ConfirmRequest) -> bool;
}

/// Accepts everything; useful for tests and non-interactive callers that
/// have already opted in
pub struct AcceptAll;

impl Confirmation for AcceptAll {
    fn confirm(&self, _request: &ConfirmRequest) -> bool {
        true
    }
}

/// Result of an engine operation that can be declined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Completed,
    /// User declined the confirmation; nothing was changed
    Declined,
}

/// Sync engine bound to a repository and a confirmation capability
pub struct SyncEngine<'a> {
    repo: &'a mut AssetRepository,
    confirm: &'a dyn Confirmation,
}

impl<'a> SyncEngine<'a> {
    pub fn new(repo: &'a mut AssetRepository, confirm: &'a dyn Confirmation) -> Self {
        Self { repo, confirm }
    }

    /// Reconcile one asset between workspace and library in the chosen
    /// direction
    ///
    /// Classifies current drift, applies the confirmation policy, transfers
    /// content, records the post-transfer workspace fingerprint as the new
    /// baseline, and triggers a rescan.
    pub fn sync(&mut self, asset: &Asset, direction: Direction) -> Result<SyncOutcome> {
        let kind = asset.kind;
        let id = asset.id.as_str();

        // Reads honor the scanned locations on both sides (covers legacy
        // rule dirs); writes always target the canonical layout
        let ws_read = self.workspace_side(asset);
        let ws_canonical = paths::asset_path(self.repo.workspace_root(), kind, id);
        let lib_read = self.library_side(kind, id);
        let lib_canonical = paths::asset_path(self.repo.library_root(), kind, id);

        if !ws_read.exists() {
            match direction {
                Direction::Up => bail!(
                    "cannot push {} '{}': no workspace copy at {:?}",
                    kind.label(),
                    id,
                    ws_read
                ),
                Direction::Down if lib_read.exists() => bail!(
                    "cannot pull {} '{}': it is not deployed in this workspace; deploy it first",
                    kind.label(),
                    id
                ),
                // Missing on both sides falls through to the new+down error
                Direction::Down => {}
            }
        }

        let mut baseline = BaselineStore::load(self.repo.workspace_root());
        let status = if !ws_read.exists() {
            SyncStatus::New
        } else {
            let local_fp = asset_fingerprint(&ws_read, kind);
            let library_fp = asset_fingerprint(&lib_read, kind);
            classify(&local_fp, &library_fp, baseline.fingerprint(kind, id)).status
        };
        debug!(
            "Sync {} '{}' {:?}: status {}",
            kind.label(),
            id,
            direction,
            status.as_str()
        );

        let request = confirmation_policy(status, direction, kind, id)?;
        if !self.confirm.confirm(&request) {
            info!("Sync of {} '{}' declined", kind.label(), id);
            return Ok(SyncOutcome::Declined);
        }

        let ws_after = match direction {
            Direction::Up => {
                transfer(kind, &ws_read, &lib_canonical, false)?;
                ws_read
            }
            Direction::Down => {
                transfer(kind, &lib_read, &ws_canonical, true)?;
                ws_canonical
            }
        };

        // Post-transfer workspace fingerprint becomes the new baseline
        let fingerprint = asset_fingerprint(&ws_after, kind);
        baseline.record(kind, id, &fingerprint)?;
        info!("Synced {} '{}' {:?}", kind.label(), id, direction);

        self.repo.refresh();
        Ok(SyncOutcome::Completed)
    }

    /// Workspace-side path for an asset: its scanned location when it lives
    /// under the workspace (covers legacy rule dirs), else the canonical spot
    fn workspace_side(&self, asset: &Asset) -> std::path::PathBuf {
        if asset.location.starts_with(self.repo.workspace_root()) && asset.location.exists() {
            asset.location.clone()
        } else {
            paths::asset_path(self.repo.workspace_root(), asset.kind, &asset.id)
        }
    }

    /// Library-side path for an asset id: the scanned location when the
    /// library hosts it (covers legacy rule dirs), else the canonical spot
    ///
    /// Must agree with what the listings classified against, or a
    /// legacy-hosted rule would read as absent here.
    fn library_side(&self, kind: AssetKind, id: &str) -> std::path::PathBuf {
        self.repo
            .library_asset(kind, id)
            .filter(|a| a.location.exists())
            .map(|a| a.location.clone())
            .unwrap_or_else(|| paths::asset_path(self.repo.library_root(), kind, id))
    }
}

/// The status × direction confirmation table
///
/// `new` + `down` is the one hard error: there is nothing to pull from an
/// absent library copy.
fn confirmation_policy(
    status: SyncStatus,
    direction: Direction,
    kind: AssetKind,
    id: &str,
) -> Result<ConfirmRequest> {
    let label = kind.label();
    let request = match (status, direction) {
        (SyncStatus::New, Direction::Up) => {
            ConfirmRequest::info(format!("Create library copy of {label} '{id}'?"))
        }
        (SyncStatus::New, Direction::Down) => {
            bail!("cannot pull {label} '{id}': it has no library copy")
        }
        (SyncStatus::Synced, _) => ConfirmRequest::info(format!(
            "{label} '{id}' is already in sync; force overwrite?"
        )),
        (SyncStatus::LocalAhead, Direction::Up) => {
            ConfirmRequest::info(format!("Push local changes of {label} '{id}' to the library?"))
        }
        (SyncStatus::LocalAhead, Direction::Down) => ConfirmRequest::warning(format!(
            "Pulling {label} '{id}' will discard local edits that were never pushed. Continue?"
        )),
        (SyncStatus::RemoteAhead, Direction::Up) => ConfirmRequest::warning(format!(
            "Pushing {label} '{id}' will discard newer library content. Continue?"
        )),
        (SyncStatus::RemoteAhead, Direction::Down) => {
            ConfirmRequest::info(format!("Pull library updates of {label} '{id}'?"))
        }
        (SyncStatus::Conflict, Direction::Up) => ConfirmRequest::warning(format!(
            "{label} '{id}' diverged on both sides; pushing overwrites the library's edits. Continue?"
        )),
        (SyncStatus::Conflict, Direction::Down) => ConfirmRequest::warning(format!(
            "{label} '{id}' diverged on both sides; pulling overwrites the local edits. Continue?"
        )),
    };
    Ok(request)
}

/// Replace `dest` with the content at `src`
///
/// Directories are delete-then-recursive-copy; files are overwritten. Rules
/// written into the workspace are re-normalized so a pulled rule always
/// carries its trigger.
fn transfer(kind: AssetKind, src: &std::path::Path, dest: &std::path::Path, into_workspace: bool) -> Result<()> {
    if !src.exists() {
        bail!("source {:?} disappeared before transfer", src);
    }
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).with_context(|| format!("Failed to create {:?}", parent))?;
    }

    // A skill deployed as a link aliases its library copy. Pulling down onto
    // the link replaces it with a real copy; in every other aliasing case
    // (pushing up through the link, workspace root == library root) deleting
    // the destination would destroy the source, and the contents are already
    // identical, so there is nothing to transfer.
    if same_entry(src, dest) {
        let dest_is_link = fs::symlink_metadata(dest)
            .map(|m| m.file_type().is_symlink())
            .unwrap_or(false);
        if !dest_is_link {
            debug!("{:?} and {:?} are the same entry, skipping copy", src, dest);
            return Ok(());
        }
    }

    match kind {
        AssetKind::Skill => {
            remove_entry(dest)?;
            copy_dir_recursive(src, dest)?;
        }
        AssetKind::Rule => {
            if into_workspace {
                let text = fs::read_to_string(src)
                    .with_context(|| format!("Failed to read {:?}", src))?;
                fs::write(dest, normalize_rule(&text))
                    .with_context(|| format!("Failed to write {:?}", dest))?;
            } else {
                fs::copy(src, dest)
                    .with_context(|| format!("Failed to copy {:?} to {:?}", src, dest))?;
            }
        }
    }
    Ok(())
}
