//! Content-type-aware preprocessing for indexing.
//!
//! Notes carry different content encodings: HTML for text notes, JSON
//! structures for mind-maps and canvases. This module extracts the plain
//! searchable text from each. Preprocessing is best-effort and never fails;
//! malformed input degrades to the raw content so a single bad note can
//! never block indexing.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::defaults::JSON_EXTRACT_MAX_DEPTH;
use crate::models::NoteType;

static SCRIPT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").unwrap());
static STYLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>").unwrap());
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Object keys treated as text-bearing during generic JSON extraction.
const TEXT_KEYS: [&str; 7] = [
    "text",
    "content",
    "value",
    "title",
    "name",
    "label",
    "description",
];

/// Extract plain searchable text from note content, dispatching on the
/// `(type, mime)` pair. Unknown combinations pass through unmodified.
pub fn preprocess_content(content: &str, note_type: NoteType, mime: &str) -> String {
    match (note_type, mime) {
        (NoteType::Text, "text/html") => strip_html(content),
        (NoteType::MindMap, "application/json") => match serde_json::from_str::<Value>(content) {
            Ok(data) => extract_mind_map_text(&data),
            Err(_) => content.to_string(),
        },
        (NoteType::Canvas, "application/json") => match serde_json::from_str::<Value>(content) {
            Ok(data) => extract_canvas_text(&data),
            Err(_) => content.to_string(),
        },
        (_, "application/json") => match serde_json::from_str::<Value>(content) {
            Ok(data) => extract_text_from_value(&data, JSON_EXTRACT_MAX_DEPTH),
            Err(_) => content.to_string(),
        },
        _ => content.to_string(),
    }
}

/// Strip HTML down to its text: script/style blocks removed, remaining tags
/// dropped (anchor text survives tag removal), standard entities decoded,
/// whitespace collapsed.
pub fn strip_html(html: &str) -> String {
    let text = SCRIPT_RE.replace_all(html, "");
    let text = STYLE_RE.replace_all(&text, "");
    let text = TAG_RE.replace_all(&text, "");

    let text = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'");

    WHITESPACE_RE.replace_all(&text, " ").trim().to_string()
}

/// Collect `topic` strings from a mind-map's `nodedata` tree, depth-first
/// pre-order.
fn extract_mind_map_text(data: &Value) -> String {
    let mut topics: Vec<&str> = Vec::new();

    fn collect<'a>(node: &'a Value, topics: &mut Vec<&'a str>) {
        if let Some(topic) = node.get("topic").and_then(Value::as_str) {
            topics.push(topic);
        }
        if let Some(children) = node.get("children").and_then(Value::as_array) {
            for child in children {
                collect(child, topics);
            }
        }
    }

    if let Some(root) = data.get("nodedata") {
        collect(root, &mut topics);
    }

    topics.join(" ")
}

/// Collect `text` fields from a canvas's text elements.
fn extract_canvas_text(data: &Value) -> String {
    let mut texts: Vec<&str> = Vec::new();

    if let Some(elements) = data.get("elements").and_then(Value::as_array) {
        for element in elements {
            if element.get("type").and_then(Value::as_str) == Some("text") {
                if let Some(text) = element.get("text").and_then(Value::as_str) {
                    texts.push(text);
                }
            }
        }
    }

    texts.join(" ")
}

/// Generic best-effort text extraction from arbitrary JSON, depth-limited
/// to avoid unbounded recursion. Text-bearing keys take priority; other
/// object values and array elements are recursed into.
fn extract_text_from_value(value: &Value, max_depth: usize) -> String {
    if max_depth == 0 {
        return String::new();
    }

    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => {
            let texts: Vec<String> = items
                .iter()
                .map(|item| extract_text_from_value(item, max_depth - 1))
                .filter(|t| !t.is_empty())
                .collect();
            texts.join(" ")
        }
        Value::Object(map) => {
            let mut texts: Vec<String> = Vec::new();
            for (key, val) in map {
                if TEXT_KEYS.contains(&key.to_lowercase().as_str()) {
                    if let Value::String(s) = val {
                        texts.push(s.clone());
                        continue;
                    }
                }
                let text = extract_text_from_value(val, max_depth - 1);
                if !text.is_empty() {
                    texts.push(text);
                }
            }
            texts.join(" ")
        }
        _ => String::new(),
    }
}
