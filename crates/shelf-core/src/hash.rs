//! Content fingerprinting
//!
//! Fingerprints are lowercase hex SHA-256 digests. A missing path yields the
//! empty-string sentinel, which the drift classifier reads as "does not
//! exist". Directory fingerprints hash the concatenation of child digests in
//! lexical order of child names, so they are independent of the order the OS
//! happens to enumerate entries in.

use std::fs;
use std::path::Path;

use sha2::{Digest as _, Sha256};
use tracing::warn;

use crate::asset::AssetKind;
use crate::normalize::normalize_rule;

/// Sentinel fingerprint for a path that does not exist
pub const EMPTY_FINGERPRINT: &str = "";

/// Fingerprint of a text blob
pub fn text_fingerprint(text: &str) -> String {
    format!("{:x}", Sha256::digest(text.as_bytes()))
}

/// Fingerprint of a file's raw bytes; empty sentinel if absent
pub fn file_fingerprint(path: &Path) -> String {
    match fs::read(path) {
        Ok(bytes) => format!("{:x}", Sha256::digest(&bytes)),
        Err(e) => {
            if path.exists() {
                warn!("Failed to read {:?} for hashing: {}", path, e);
            }
            EMPTY_FINGERPRINT.to_string()
        }
    }
}

/// Fingerprint of a directory tree; empty sentinel if absent
///
/// Symlinked directories are followed, so a skill deployed as a link hashes
/// identically to its library source.
pub fn dir_fingerprint(path: &Path) -> String {
    if !path.is_dir() {
        return EMPTY_FINGERPRINT.to_string();
    }

    let mut entries: Vec<(String, std::path::PathBuf)> = match fs::read_dir(path) {
        Ok(rd) => rd
            .flatten()
            .map(|e| (e.file_name().to_string_lossy().into_owned(), e.path()))
            .collect(),
        Err(e) => {
            warn!("Failed to list {:?} for hashing: {}", path, e);
            return EMPTY_FINGERPRINT.to_string();
        }
    };
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let mut concat = String::new();
    for (_, child) in entries {
        if child.is_dir() {
            concat.push_str(&dir_fingerprint(&child));
        } else {
            concat.push_str(&file_fingerprint(&child));
        }
    }

    text_fingerprint(&concat)
}

/// Fingerprint of a rule file's normalized text; empty sentinel if absent
///
/// Hashing the normalized form is what makes cosmetic edits (line endings, a
/// missing default trigger) invisible to drift detection.
pub fn rule_fingerprint(path: &Path) -> String {
    match fs::read_to_string(path) {
        Ok(text) => text_fingerprint(&normalize_rule(&text)),
        Err(e) => {
            if path.exists() {
                warn!("Failed to read rule {:?} for hashing: {}", path, e);
            }
            EMPTY_FINGERPRINT.to_string()
        }
    }
}

/// Kind-appropriate fingerprint of an asset location
pub fn asset_fingerprint(path: &Path, kind: AssetKind) -> String {
    match kind {
        AssetKind::Skill => dir_fingerprint(path),
        AssetKind::Rule => rule_fingerprint(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_path_yields_sentinel() {
        let temp = tempdir().unwrap();
        let gone = temp.path().join("nope");
        assert_eq!(file_fingerprint(&gone), EMPTY_FINGERPRINT);
        assert_eq!(dir_fingerprint(&gone), EMPTY_FINGERPRINT);
        assert_eq!(rule_fingerprint(&gone), EMPTY_FINGERPRINT);
    }

    #[test]
    fn test_file_fingerprint_tracks_content() {
        let temp = tempdir().unwrap();
        let f = temp.path().join("a.txt");
        std::fs::write(&f, "hello").unwrap();
        let first = file_fingerprint(&f);
        assert_eq!(first, file_fingerprint(&f));

        std::fs::write(&f, "hello!").unwrap();
        assert_ne!(first, file_fingerprint(&f));
    }

    #[test]
    fn test_dir_fingerprint_independent_of_enumeration_order() {
        // Identical name→content structure, with files created (and thus
        // typically enumerated) in opposite orders
        let forward = tempdir().unwrap();
        std::fs::create_dir_all(forward.path().join("sub")).unwrap();
        std::fs::write(forward.path().join("a.txt"), "ay").unwrap();
        std::fs::write(forward.path().join("b.txt"), "bee").unwrap();
        std::fs::write(forward.path().join("sub/c.txt"), "see").unwrap();

        let reverse = tempdir().unwrap();
        std::fs::write(reverse.path().join("b.txt"), "bee").unwrap();
        std::fs::write(reverse.path().join("a.txt"), "ay").unwrap();
        std::fs::create_dir_all(reverse.path().join("sub")).unwrap();
        std::fs::write(reverse.path().join("sub/c.txt"), "see").unwrap();

        assert_eq!(dir_fingerprint(forward.path()), dir_fingerprint(reverse.path()));

        // Cycling an entry through a rename perturbs directory order on many
        // filesystems; the fingerprint must not move
        let before = dir_fingerprint(forward.path());
        std::fs::rename(forward.path().join("a.txt"), forward.path().join("z.tmp")).unwrap();
        std::fs::rename(forward.path().join("z.tmp"), forward.path().join("a.txt")).unwrap();
        assert_eq!(dir_fingerprint(forward.path()), before);
    }

    #[test]
    fn test_dir_fingerprint_sees_nested_edits() {
        let temp = tempdir().unwrap();
        std::fs::create_dir_all(temp.path().join("sub")).unwrap();
        std::fs::write(temp.path().join("sub/c.txt"), "one").unwrap();
        let before = dir_fingerprint(temp.path());

        std::fs::write(temp.path().join("sub/c.txt"), "two").unwrap();
        assert_ne!(before, dir_fingerprint(temp.path()));
    }

    #[test]
    fn test_rule_fingerprint_ignores_cosmetic_drift() {
        let temp = tempdir().unwrap();
        let bare = temp.path().join("bare.md");
        let marked = temp.path().join("marked.md");
        std::fs::write(&bare, "# Rule\r\nBody\r\n").unwrap();
        std::fs::write(&marked, "---\ntrigger: always_on\n---\n# Rule\nBody\n").unwrap();
        assert_eq!(rule_fingerprint(&bare), rule_fingerprint(&marked));
    }
}
