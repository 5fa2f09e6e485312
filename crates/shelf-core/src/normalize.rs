//! Rule document canonicalization
//!
//! Rules are hashed and written in normalized form so cosmetic differences
//! (line endings, a missing default trigger) never register as drift.
//! Normalization is idempotent: `normalize_rule(normalize_rule(x)) ==
//! normalize_rule(x)` for all inputs, which the baseline logic depends on.

/// Metadata block fence line
const FENCE: &str = "---";

/// Required metadata key for rules
pub const TRIGGER_KEY: &str = "trigger";

/// Default injected when a rule carries no trigger
pub const DEFAULT_TRIGGER: &str = "always_on";

/// Canonicalize a rule document
///
/// Unifies all line endings to `\n`, then guarantees a leading metadata block
/// containing a `trigger` key: injected with [`DEFAULT_TRIGGER`] when missing,
/// left verbatim when present in any casing. All other content is preserved.
pub fn normalize_rule(text: &str) -> String {
    let text = unify_line_endings(text);

    match metadata_block(&text) {
        Some(block) => {
            if block.lines.iter().any(|l| is_trigger_line(l)) {
                return text;
            }
            // Inject the trigger as the first line inside the block
            let mut out = String::with_capacity(text.len() + 32);
            out.push_str(FENCE);
            out.push('\n');
            out.push_str(&format!("{TRIGGER_KEY}: {DEFAULT_TRIGGER}\n"));
            for line in &block.lines {
                out.push_str(line);
                out.push('\n');
            }
            out.push_str(FENCE);
            out.push_str(&text[block.end_of_closing_fence..]);
            out
        }
        None => {
            format!("{FENCE}\n{TRIGGER_KEY}: {DEFAULT_TRIGGER}\n{FENCE}\n{text}")
        }
    }
}

fn unify_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

struct MetadataBlock<'a> {
    /// Lines strictly between the fences
    lines: Vec<&'a str>,
    /// Byte offset just past the closing `---`
    end_of_closing_fence: usize,
}

/// Detect a leading fenced metadata block; input must already be `\n`-only
fn metadata_block(text: &str) -> Option<MetadataBlock<'_>> {
    let first_line_end = text.find('\n')?;
    if &text[..first_line_end] != FENCE {
        return None;
    }

    let mut lines = Vec::new();
    let mut offset = first_line_end + 1;
    while offset <= text.len() {
        let line_end = text[offset..]
            .find('\n')
            .map(|i| offset + i)
            .unwrap_or(text.len());
        let line = &text[offset..line_end];
        if line == FENCE {
            return Some(MetadataBlock {
                lines,
                end_of_closing_fence: line_end,
            });
        }
        lines.push(line);
        if line_end == text.len() {
            break;
        }
        offset = line_end + 1;
    }
    // Opening fence without a closing one: not a metadata block
    None
}

/// `trigger:` in any casing counts as present; never duplicate it
fn is_trigger_line(line: &str) -> bool {
    match line.split_once(':') {
        Some((key, _)) => key.trim().eq_ignore_ascii_case(TRIGGER_KEY),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthesizes_block_when_absent() {
        let out = normalize_rule("# Style\n\nAlways respond in English.\n");
        assert!(out.starts_with("---\ntrigger: always_on\n---\n# Style\n"));
    }

    #[test]
    fn test_injects_trigger_into_existing_block() {
        let out = normalize_rule("---\nscope: project\n---\n\nBody\n");
        assert_eq!(out, "---\ntrigger: always_on\nscope: project\n---\n\nBody\n");
    }

    #[test]
    fn test_preserves_existing_trigger_any_casing() {
        let input = "---\nTrigger: manual\n---\nBody\n";
        assert_eq!(normalize_rule(input), input);
    }

    #[test]
    fn test_unifies_crlf_and_cr() {
        let out = normalize_rule("---\r\ntrigger: always_on\r\n---\rBody\r\n");
        assert!(!out.contains('\r'));
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "",
            "plain body with no block",
            "# Heading only",
            "---\n---\n",
            "---\nnot closed",
            "---\r\nkey: v\r\n---\r\nBody",
            "---\nTRIGGER: off\n---\nBody",
            "--- not a fence\ntext",
        ];
        for s in samples {
            let once = normalize_rule(s);
            assert_eq!(normalize_rule(&once), once, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn test_unclosed_fence_treated_as_body() {
        let out = normalize_rule("---\norphan");
        assert!(out.starts_with("---\ntrigger: always_on\n---\n---\norphan"));
    }
}
