//! Centralized path utilities
//!
//! All library/workspace layout joins in one place for consistency.

use std::path::{Path, PathBuf};

use crate::asset::AssetKind;

/// Namespace directory holding skills and rules under either root
pub const NAMESPACE_DIR: &str = ".agent";

/// Legacy namespace still scanned for rules (read-only, never written)
pub const LEGACY_NAMESPACE_DIR: &str = ".gemini";

/// Manifest file that marks a directory as a skill
pub const SKILL_MANIFEST: &str = "SKILL.md";

/// Baseline document name inside the workspace namespace directory
pub const BASELINE_FILE: &str = ".sync_meta.json";

/// Get the skills directory under a root (`<root>/.agent/skills`)
pub fn skills_dir(root: &Path) -> PathBuf {
    root.join(NAMESPACE_DIR).join("skills")
}

/// Get the rules directory under a root (`<root>/.agent/rules`)
pub fn rules_dir(root: &Path) -> PathBuf {
    root.join(NAMESPACE_DIR).join("rules")
}

/// Get the legacy rules directory under a root (`<root>/.gemini/rules`)
pub fn legacy_rules_dir(root: &Path) -> PathBuf {
    root.join(LEGACY_NAMESPACE_DIR).join("rules")
}

/// Get the asset directory for a kind under a root
pub fn kind_dir(root: &Path, kind: AssetKind) -> PathBuf {
    match kind {
        AssetKind::Skill => skills_dir(root),
        AssetKind::Rule => rules_dir(root),
    }
}

/// Get the canonical on-disk location of an asset under a root
pub fn asset_path(root: &Path, kind: AssetKind, id: &str) -> PathBuf {
    kind_dir(root, kind).join(kind.entry_name(id))
}

/// Get the baseline document path for a workspace (`<ws>/.agent/.sync_meta.json`)
pub fn baseline_path(workspace_root: &Path) -> PathBuf {
    workspace_root.join(NAMESPACE_DIR).join(BASELINE_FILE)
}

/// Get the shelf config directory (~/.shelf)
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".shelf")
}

/// Get the user config file (~/.shelf/config.toml)
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_path_layout() {
        let root = Path::new("/lib");
        assert_eq!(
            asset_path(root, AssetKind::Skill, "git-commit"),
            PathBuf::from("/lib/.agent/skills/git-commit")
        );
        assert_eq!(
            asset_path(root, AssetKind::Rule, "style"),
            PathBuf::from("/lib/.agent/rules/style.md")
        );
    }

    #[test]
    fn test_baseline_lives_in_namespace() {
        let p = baseline_path(Path::new("/ws"));
        assert_eq!(p, PathBuf::from("/ws/.agent/.sync_meta.json"));
    }
}
