//! Source extractors: raw JSON document → canonical records.
//!
//! Upstream schemas drift, so every extractor locates its entry list with
//! an ordered set of [`Locator`]s and reads each field through a list of
//! fallback names.

pub mod credly;
pub mod transcript;

use serde_json::Value;
use tracing::debug;

use crate::error::SyncError;
use crate::model::{CanonicalRecord, Source};

pub use credly::{CredlyBadges, CredlyExams, RawBadge};
pub use transcript::LearnTranscript;

/// One strategy for finding the entry list inside a document.
pub type Locator = fn(&Value) -> Option<&Vec<Value>>;

/// Turns one source's document into canonical records, in document order.
pub trait Extractor {
    fn source(&self) -> Source;

    fn extract(&self, doc: &Value) -> Result<Vec<CanonicalRecord>, SyncError>;
}

/// Decode a response body, tolerating a leading UTF-8 BOM.
pub fn decode(source: Source, body: &str) -> Result<Value, SyncError> {
    let trimmed = body.trim_start_matches('\u{feff}');
    serde_json::from_str(trimmed).map_err(|e| SyncError::Decode {
        origin: source,
        message: format!("{e} (body: {})", preview(trimmed)),
    })
}

fn preview(body: &str) -> &str {
    match body.char_indices().nth(200) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

// ---------------------------------------------------------------------------
// Entry location
// ---------------------------------------------------------------------------

/// Try `locators` in order and return the first non-empty list.
///
/// An empty list found by any locator means "no entries" rather than an
/// error. Finding no list at all is a malformed response.
pub(crate) fn locate_entries<'a>(
    source: Source,
    doc: &'a Value,
    locators: &[Locator],
) -> Result<&'a [Value], SyncError> {
    if !doc.is_object() && !doc.is_array() {
        return Err(SyncError::malformed(
            source,
            "expected a JSON object or array at the top level",
        ));
    }

    let mut saw_empty = false;
    for (idx, locate) in locators.iter().enumerate() {
        match locate(doc) {
            Some(entries) if !entries.is_empty() => {
                debug!(%source, locator = idx, count = entries.len(), "located entries");
                return Ok(entries.as_slice());
            }
            Some(_) => saw_empty = true,
            None => {}
        }
    }

    if saw_empty {
        debug!(%source, "entry list present but empty");
        Ok(&[])
    } else {
        Err(SyncError::malformed(source, "no entry list found in response"))
    }
}

/// Depth-first search (document order) for an array stored under a key
/// accepted by `key_matches`. A non-empty hit beats an earlier empty one.
pub(crate) fn find_array<'a>(
    value: &'a Value,
    key_matches: &dyn Fn(&str) -> bool,
) -> Option<&'a Vec<Value>> {
    let mut empty_hit = None;
    search_array(value, key_matches, &mut empty_hit).or(empty_hit)
}

fn search_array<'a>(
    value: &'a Value,
    key_matches: &dyn Fn(&str) -> bool,
    empty_hit: &mut Option<&'a Vec<Value>>,
) -> Option<&'a Vec<Value>> {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                if key_matches(key) {
                    if let Value::Array(items) = child {
                        if !items.is_empty() {
                            return Some(items);
                        }
                        if empty_hit.is_none() {
                            *empty_hit = Some(items);
                        }
                        continue;
                    }
                }
                if let Some(found) = search_array(child, key_matches, empty_hit) {
                    return Some(found);
                }
            }
            None
        }
        Value::Array(items) => {
            for item in items {
                if let Some(found) = search_array(item, key_matches, empty_hit) {
                    return Some(found);
                }
            }
            None
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Field helpers
// ---------------------------------------------------------------------------

/// Look up a dot-separated path (`badge_template.name`). Each segment is
/// matched exactly first, then case-insensitively.
pub(crate) fn value_at<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = value;
    for segment in path.split('.') {
        let map = current.as_object()?;
        current = match map.get(segment) {
            Some(v) => v,
            None => map
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(segment))
                .map(|(_, v)| v)?,
        };
    }
    Some(current)
}

/// Scalar JSON value as text. Null, arrays and objects have no text.
pub(crate) fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// First non-empty text among `paths`, or the empty string.
pub(crate) fn first_text(value: &Value, paths: &[&str]) -> String {
    paths
        .iter()
        .filter_map(|p| value_at(value, p).and_then(text_of))
        .find(|s| !s.is_empty())
        .unwrap_or_default()
}

/// Calendar date portion of an ISO-8601 timestamp (text before `T`).
pub(crate) fn date_part(timestamp: &str) -> String {
    timestamp
        .split('T')
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn top_level_items(doc: &Value) -> Option<&Vec<Value>> {
        doc.get("items").and_then(Value::as_array)
    }

    fn nested_items(doc: &Value) -> Option<&Vec<Value>> {
        find_array(doc, &|k| k == "items")
    }

    #[test]
    fn first_non_empty_locator_wins() {
        let doc = json!({"items": [], "wrapper": {"items": [1, 2]}});
        let entries =
            locate_entries(Source::Credly, &doc, &[top_level_items, nested_items]).unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn empty_list_is_not_an_error() {
        let doc = json!({"items": []});
        let entries = locate_entries(Source::Credly, &doc, &[top_level_items]).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn missing_list_is_malformed() {
        let doc = json!({"other": {"thing": 1}});
        let err = locate_entries(Source::Credly, &doc, &[top_level_items, nested_items])
            .unwrap_err();
        assert!(matches!(err, SyncError::MalformedResponse { .. }));
    }

    #[test]
    fn scalar_document_is_malformed() {
        let err = locate_entries(Source::Credly, &json!("nope"), &[top_level_items]).unwrap_err();
        assert!(matches!(err, SyncError::MalformedResponse { .. }));
    }

    #[test]
    fn find_array_prefers_non_empty_hit() {
        let doc = json!({
            "a": {"items": []},
            "b": [{"c": {"items": ["x"]}}]
        });
        let found = find_array(&doc, &|k| k == "items").unwrap();
        assert_eq!(found, &vec![json!("x")]);
    }

    #[test]
    fn value_at_falls_back_to_case_insensitive_keys() {
        let doc = json!({"Badge_Template": {"NAME": "Azure"}});
        assert_eq!(first_text(&doc, &["badge_template.name"]), "Azure");
    }

    #[test]
    fn first_text_skips_blank_values() {
        let doc = json!({"primary": "  ", "alt": 42});
        assert_eq!(first_text(&doc, &["primary", "alt"]), "42");
        assert_eq!(first_text(&doc, &["missing"]), "");
    }

    #[test]
    fn date_part_strips_time() {
        assert_eq!(date_part("2023-05-01T10:22:33Z"), "2023-05-01");
        assert_eq!(date_part("2023-05-01"), "2023-05-01");
        assert_eq!(date_part(""), "");
    }

    #[test]
    fn decode_tolerates_bom() {
        let value = decode(Source::MicrosoftLearn, "\u{feff}{\"a\":1}").unwrap();
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn decode_reports_invalid_json() {
        let err = decode(Source::Credly, "<html>").unwrap_err();
        assert!(matches!(err, SyncError::Decode { origin: Source::Credly, .. }));
        assert!(err.to_string().contains("<html>"));
    }
}
