//! Note content extraction: title, body, word count.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

/// What a note file contributes to its index entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedNote {
    /// Frontmatter `title:`, else the first heading, else the file stem.
    pub title: String,
    /// Content without the frontmatter and the heading used as title.
    pub body: String,
    /// Number of whitespace-separated words in the body.
    pub word_count: u32,
}

static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    // ATX heading of any level, optional closing hashes
    Regex::new(r"(?m)^[ ]{0,3}#{1,6}[ \t]+(.+?)(?:[ \t]+#+)?[ \t]*\r?$").unwrap()
});

/// Extract note information from file content.
pub fn extract_note(content: &str, relative_path: &str) -> ExtractedNote {
    let (frontmatter, rest) = split_frontmatter(content);

    let fm_title = frontmatter.as_ref().and_then(|fm| fm.get("title")).and_then(|v| match v {
        serde_yaml::Value::String(s) => Some(s.trim().to_string()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        _ => None,
    });

    let (title, body) = match fm_title.filter(|t| !t.is_empty()) {
        Some(title) => (title, rest.trim().to_string()),
        None => match HEADING_RE.captures(rest) {
            Some(caps) => {
                let whole = caps.get(0).map_or(0..0, |m| m.range());
                let heading = caps.get(1).map_or("", |m| m.as_str()).to_string();
                let body = format!("{}{}", &rest[..whole.start], &rest[whole.end..]);
                (heading, body.trim().to_string())
            }
            None => (file_stem(relative_path), rest.trim().to_string()),
        },
    };

    let word_count = u32::try_from(body.split_whitespace().count()).unwrap_or(u32::MAX);

    ExtractedNote { title, body, word_count }
}

/// Split a leading `---` YAML block from the rest of the document.
///
/// Invalid YAML or a missing closing delimiter leaves the content whole.
fn split_frontmatter(content: &str) -> (Option<serde_yaml::Mapping>, &str) {
    let Some(after_open) =
        content.strip_prefix("---\n").or_else(|| content.strip_prefix("---\r\n"))
    else {
        return (None, content);
    };

    let mut offset = 0;
    for line in after_open.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let yaml = &after_open[..offset];
            let rest = &after_open[offset + line.len()..];
            return match serde_yaml::from_str::<serde_yaml::Mapping>(yaml) {
                Ok(mapping) => (Some(mapping), rest),
                Err(_) if yaml.trim().is_empty() => (None, rest),
                Err(e) => {
                    tracing::debug!("ignoring invalid frontmatter: {}", e);
                    (None, content)
                }
            };
        }
        offset += line.len();
    }

    (None, content)
}

fn file_stem(relative_path: &str) -> String {
    Path::new(relative_path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Untitled")
        .to_string()
}
