use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// Phrases that declare an authoritative project root in turn content.
pub const PROJECT_ROOT_MARKERS: [&str; 2] = ["Active project root:", "Project set to"];

/// Slash-prefixed tokens up to obvious delimiters.
static PATH_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"/[^\s"'<>]+"#).unwrap());

const TRAILING_PUNCT: &[char] = &['.', ',', ';', ':', ')', ']', '}'];

/// Concatenate a record's textual evidence: the title (if textual), then
/// each turn's `content` (if textual), in order, newline-separated.
///
/// Fields with the wrong shape (a non-array `turns`, a non-string
/// `content`) contribute nothing.
pub fn context_blob(record: &Value) -> String {
    let mut parts: Vec<&str> = Vec::new();
    if let Some(title) = record.get("title").and_then(Value::as_str) {
        parts.push(title);
    }
    if let Some(turns) = record.get("turns").and_then(Value::as_array) {
        for turn in turns {
            if let Some(content) = turn.get("content").and_then(Value::as_str) {
                parts.push(content);
            }
        }
    }
    parts.join("\n")
}

/// Collect path candidates from a record's textual evidence.
///
/// Three sources feed one flat list, in encounter order: a slash-prefixed
/// title, text declared after a root marker, and bare path-shaped tokens.
/// The list may contain duplicates; ranking deduplicates.
pub fn extract_candidates(record: &Value) -> Vec<String> {
    let mut candidates: Vec<String> = Vec::new();

    if let Some(title) = record.get("title").and_then(Value::as_str) {
        if title.starts_with('/') {
            candidates.push(title.trim().to_string());
        }
    }

    if let Some(turns) = record.get("turns").and_then(Value::as_array) {
        for turn in turns {
            let Some(content) = turn.get("content").and_then(Value::as_str) else {
                continue;
            };
            marker_declarations(content, &mut candidates);
            path_tokens(content, &mut candidates);
        }
    }

    candidates
}

/// Harvest the text following each root-marker occurrence, up to the end
/// of its line. Declarations that do not start with `/` are noise.
fn marker_declarations(content: &str, out: &mut Vec<String>) {
    for marker in PROJECT_ROOT_MARKERS {
        for (idx, _) in content.match_indices(marker) {
            let rest = &content[idx + marker.len()..];
            let line = rest.split('\n').next().unwrap_or("").trim();
            if !line.is_empty() && line.starts_with('/') {
                out.push(line.to_string());
            }
        }
    }
}

/// Scan for slash-prefixed tokens, stripping trailing punctuation.
/// Tokens starting `//` are protocol-relative references, not local paths.
fn path_tokens(content: &str, out: &mut Vec<String>) {
    for m in PATH_TOKEN.find_iter(content) {
        let token = m.as_str().trim_end_matches(TRAILING_PUNCT);
        if token.starts_with("//") {
            continue;
        }
        out.push(token.to_string());
    }
}
