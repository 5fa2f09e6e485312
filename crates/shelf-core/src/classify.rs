//! Drift classification
//!
//! Pure function over the (local, library, baseline) fingerprint triple; no
//! filesystem access and no clock. The check order is load-bearing:
//! `local_ahead` and `remote_ahead` are mutually exclusive only because
//! `synced` is checked first, and any remaining disagreement is a conflict —
//! neither side is ever silently preferred.

use crate::asset::SyncStatus;
use crate::hash::EMPTY_FINGERPRINT;

/// Classification result: the status plus a short human-readable explanation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Drift {
    pub status: SyncStatus,
    pub hint: &'static str,
}

/// Classify an asset's drift from its three fingerprints
///
/// The empty sentinel means "does not exist" on that side (or "never synced"
/// for the baseline).
pub fn classify(local_fp: &str, library_fp: &str, baseline_fp: &str) -> Drift {
    if library_fp == EMPTY_FINGERPRINT {
        Drift {
            status: SyncStatus::New,
            hint: "exists only here, no library copy",
        }
    } else if local_fp == library_fp {
        Drift {
            status: SyncStatus::Synced,
            hint: "in sync with the library",
        }
    } else if local_fp != baseline_fp && library_fp == baseline_fp {
        Drift {
            status: SyncStatus::LocalAhead,
            hint: "local edits not yet pushed to the library",
        }
    } else if local_fp == baseline_fp && library_fp != baseline_fp {
        Drift {
            status: SyncStatus::RemoteAhead,
            hint: "library has newer content",
        }
    } else {
        Drift {
            status: SyncStatus::Conflict,
            hint: "both copies changed since the last sync",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_library_copy_is_new() {
        assert_eq!(classify("A", "", "").status, SyncStatus::New);
        // Even with a stale baseline entry hanging around
        assert_eq!(classify("A", "", "A").status, SyncStatus::New);
    }

    #[test]
    fn test_equal_fingerprints_are_synced_never_conflict() {
        assert_eq!(classify("A", "A", "A").status, SyncStatus::Synced);
        // Equal sides trump a mismatched baseline
        assert_eq!(classify("A", "A", "B").status, SyncStatus::Synced);
        assert_eq!(classify("A", "A", "").status, SyncStatus::Synced);
    }

    #[test]
    fn test_single_sided_drift() {
        assert_eq!(classify("B", "A", "A").status, SyncStatus::LocalAhead);
        assert_eq!(classify("A", "B", "A").status, SyncStatus::RemoteAhead);
    }

    #[test]
    fn test_double_drift_is_conflict() {
        assert_eq!(classify("B", "C", "A").status, SyncStatus::Conflict);
        // Never-synced but differing copies: also a conflict
        assert_eq!(classify("A", "B", "").status, SyncStatus::Conflict);
    }

    #[test]
    fn test_totality_over_sentinel_combinations() {
        let fps = ["", "A", "B", "C"];
        for l in fps {
            for r in fps {
                for b in fps {
                    // Must not panic, and the hint always matches the status
                    let d = classify(l, r, b);
                    assert!(!d.hint.is_empty());
                }
            }
        }
    }

    #[test]
    fn test_missing_local_reads_as_local_change() {
        // Working copy deleted out from under us: the local side is what
        // moved away from the baseline
        assert_eq!(classify("", "A", "A").status, SyncStatus::LocalAhead);
        // Never deployed at all: only the library side differs from baseline
        assert_eq!(classify("", "A", "").status, SyncStatus::RemoteAhead);
    }
}
