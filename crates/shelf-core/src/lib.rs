//! shelf-core - skill/rule library management with drift-aware sync
//!
//! Manages a shared library of reusable assets and their deployment into a
//! project workspace:
//! - **Skill**: a directory containing a `SKILL.md` manifest with YAML-ish
//!   front matter (`name:` / `description:`)
//! - **Rule**: a single markdown file with an optional leading metadata block
//!
//! # Directory Structure
//!
//! Both roots share one layout:
//! - Library: `<lib>/.agent/skills/<id>/SKILL.md`, `<lib>/.agent/rules/<id>.md`
//! - Workspace: same paths under the project root, plus a read-only legacy
//!   `.gemini/rules/` directory merged for backward compatibility
//! - Baseline: `<ws>/.agent/.sync_meta.json`
//!
//! # Usage
//!
//! ```rust,ignore
//! use shelf_core::{AssetKind, AssetRepository, Direction, SyncEngine};
//!
//! let mut repo = AssetRepository::open(&library_root, &workspace_root);
//! for asset in repo.list_working_only(AssetKind::Rule) {
//!     println!("{}: {:?}", asset.id, asset.status);
//! }
//!
//! let asset = repo.library_asset(AssetKind::Rule, "style").unwrap().clone();
//! SyncEngine::new(&mut repo, &prompt).sync(&asset, Direction::Down)?;
//! ```
//!
//! Drift between the two copies of an asset is classified from content
//! fingerprints against a persisted per-workspace baseline; see [`classify`]
//! for the state machine. Conflicts are surfaced, never merged.

pub mod asset;
pub mod baseline;
pub mod classify;
pub mod config;
pub mod deploy;
pub mod fsutil;
pub mod hash;
pub mod metadata;
pub mod normalize;
pub mod paths;
pub mod repo;
pub mod sync;

pub use asset::{Asset, AssetKind, SyncStatus};
pub use baseline::{BaselineEntry, BaselineStore};
pub use classify::{classify, Drift};
pub use config::{Config, ConfigError};
pub use deploy::DeploymentEngine;
pub use repo::{AssetRepository, RepoChanged};
pub use sync::{
    AcceptAll, ConfirmRequest, Confirmation, Direction, Severity, SyncEngine, SyncOutcome,
};
