//! Best-effort name/description extraction from asset file blobs
//!
//! Skills carry YAML-ish front matter (`name:` / `description:` scalars);
//! rules fall back to the first level-1 heading and the first substantive
//! body line. Extraction never fails: missing fields degrade to the id.

use once_cell::sync::Lazy;
use regex::Regex;

/// Rule descriptions are cut to this many characters
pub const DESCRIPTION_LIMIT: usize = 60;

/// Body lines shorter than this are not considered descriptive
const MIN_DESCRIPTION_LINE: usize = 10;

static FRONT_MATTER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\A---\r?\n((?s).+?)\r?\n---").expect("front matter regex"));
static NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^name:\s*(.+)$").expect("name regex"));
static DESC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^description:\s*(.+)$").expect("description regex"));
static TITLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^#\s+(.+)$").expect("title regex"));

/// Extracted display metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocMeta {
    pub name: String,
    pub description: String,
}

/// Parse a skill's `SKILL.md`: front matter `name:`/`description:`, first
/// match per key wins; the directory name is the fallback for both id and name
pub fn parse_skill_manifest(content: &str, fallback_name: &str) -> DocMeta {
    let mut name = fallback_name.to_string();
    let mut description = String::new();

    if let Some(m) = FRONT_MATTER_RE.captures(content) {
        let yaml = m.get(1).map(|g| g.as_str()).unwrap_or_default();
        if let Some(n) = NAME_RE.captures(yaml) {
            name = n[1].trim().to_string();
        }
        if let Some(d) = DESC_RE.captures(yaml) {
            description = d[1].trim().to_string();
        }
    }

    DocMeta { name, description }
}

/// Parse a rule document: display name from the first `# ` heading (falling
/// back to the id), description from the first substantive body line
pub fn parse_rule_doc(content: &str, id: &str) -> DocMeta {
    let name = TITLE_RE
        .captures(content)
        .map(|m| m[1].trim().to_string())
        .unwrap_or_else(|| id.to_string());

    let description = first_substantive_line(content)
        .map(truncate_description)
        .unwrap_or_default();

    DocMeta { name, description }
}

/// First line that is non-empty, not a heading, not a list item, and long
/// enough to say something
fn first_substantive_line(content: &str) -> Option<&str> {
    content.lines().map(str::trim).find(|line| {
        !line.is_empty()
            && !line.starts_with('#')
            && !line.starts_with('*')
            && !line.starts_with('-')
            && line.len() > MIN_DESCRIPTION_LINE
    })
}

fn truncate_description(line: &str) -> String {
    let mut out: String = line.chars().take(DESCRIPTION_LIMIT).collect();
    out.push_str("...");
    out
}
