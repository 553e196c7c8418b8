//! Credly public badge feed (`/users/<username>/badges.json`).

use serde_json::Value;
use tracing::debug;

use crate::config::BadgeMap;
use crate::error::SyncError;
use crate::matcher::BadgeMatch;
use crate::model::{CanonicalRecord, CodeKind, Source};

use super::{date_part, find_array, first_text, locate_entries, Extractor, Locator};

pub const UNKNOWN_ISSUER: &str = "Unknown";

const LOCATORS: &[Locator] = &[top_level_data, document_array, nested_data];

fn top_level_data(doc: &Value) -> Option<&Vec<Value>> {
    doc.get("data").and_then(Value::as_array)
}

fn document_array(doc: &Value) -> Option<&Vec<Value>> {
    doc.as_array()
}

fn nested_data(doc: &Value) -> Option<&Vec<Value>> {
    find_array(doc, &|key| key == "data")
}

// ---------------------------------------------------------------------------
// Parsed badge
// ---------------------------------------------------------------------------

/// Source-level view of one badge, before it becomes a canonical record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBadge {
    pub title: String,
    pub slug: String,
    pub issuer: String,
    pub date: String,
}

/// Parse every badge in a Credly document, in document order. Entries
/// without a resolvable title are skipped.
pub fn parse_badges(doc: &Value) -> Result<Vec<RawBadge>, SyncError> {
    let entries = locate_entries(Source::Credly, doc, LOCATORS)?;
    Ok(entries
        .iter()
        .enumerate()
        .filter_map(|(idx, entry)| {
            let badge = parse_badge(entry);
            if badge.is_none() {
                debug!(index = idx, "skipping Credly entry without a title");
            }
            badge
        })
        .collect())
}

fn parse_badge(entry: &Value) -> Option<RawBadge> {
    if !entry.is_object() {
        return None;
    }
    let title = first_text(entry, &["badge_template.name", "name"]);
    if title.is_empty() {
        return None;
    }
    let slug = first_text(
        entry,
        &[
            "badge_template.badge_template_earnable_id",
            "badge_template.vanity_slug",
        ],
    );
    let date = date_part(&first_text(entry, &["issued_at_date", "issued_at"]));
    let issuer = entry
        .get("issuer")
        .map(issuer_name)
        .unwrap_or_else(|| UNKNOWN_ISSUER.to_string());

    Some(RawBadge {
        title,
        slug,
        issuer,
        date,
    })
}

/// Resolve the issuer display name.
///
/// Preference: the entity flagged `primary`, then the first entity, then
/// the `summary` text, then [`UNKNOWN_ISSUER`]. A leading "issued by " is
/// removed in every case.
pub fn issuer_name(issuer: &Value) -> String {
    let entities = issuer
        .get("entities")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let primary = entities
        .iter()
        .find(|e| e.get("primary").and_then(Value::as_bool) == Some(true));

    let candidates = primary
        .into_iter()
        .chain(entities.first())
        .map(|e| first_text(e, &["entity.name", "name"]))
        .chain(std::iter::once(first_text(issuer, &["summary"])));

    for candidate in candidates {
        let name = strip_issued_by(&candidate);
        if !name.is_empty() {
            return name.to_string();
        }
    }
    UNKNOWN_ISSUER.to_string()
}

fn strip_issued_by(name: &str) -> &str {
    const PREFIX: &str = "issued by ";
    let name = name.trim();
    match name.get(..PREFIX.len()) {
        Some(head) if head.eq_ignore_ascii_case(PREFIX) => name[PREFIX.len()..].trim(),
        _ => name,
    }
}

// ---------------------------------------------------------------------------
// Extractors
// ---------------------------------------------------------------------------

/// Badge view: every badge, with the issuer name in `code`.
#[derive(Debug, Default, Clone, Copy)]
pub struct CredlyBadges;

impl Extractor for CredlyBadges {
    fn source(&self) -> Source {
        Source::Credly
    }

    fn extract(&self, doc: &Value) -> Result<Vec<CanonicalRecord>, SyncError> {
        Ok(parse_badges(doc)?
            .into_iter()
            .map(|b| {
                CanonicalRecord::new(b.title, b.issuer, b.date, Source::Credly, CodeKind::Issuer)
            })
            .collect())
    }
}

/// Exam view: badges mapped to exam codes; unrecognized badges dropped.
#[derive(Debug, Clone, Copy)]
pub struct CredlyExams<'a> {
    map: &'a BadgeMap,
}

impl<'a> CredlyExams<'a> {
    pub fn new(map: &'a BadgeMap) -> Self {
        Self { map }
    }

    pub fn to_record(&self, badge: RawBadge) -> Option<CanonicalRecord> {
        let (code, kind) = match self.map.resolve(&badge.slug, &badge.title) {
            BadgeMatch::Exact(code) => (code, CodeKind::Exact),
            BadgeMatch::Fallback(tag) => (tag, CodeKind::Fallback),
            BadgeMatch::Unmapped => {
                debug!(title = %badge.title, slug = %badge.slug, "dropping unmapped badge");
                return None;
            }
        };
        Some(CanonicalRecord::new(badge.title, code, badge.date, Source::Credly, kind))
    }
}

impl Extractor for CredlyExams<'_> {
    fn source(&self) -> Source {
        Source::Credly
    }

    fn extract(&self, doc: &Value) -> Result<Vec<CanonicalRecord>, SyncError> {
        Ok(parse_badges(doc)?
            .into_iter()
            .filter_map(|b| self.to_record(b))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn badge(name: &str, slug: &str, date: &str, issuer: Value) -> Value {
        json!({
            "issued_at_date": date,
            "badge_template": {
                "name": name,
                "badge_template_earnable_id": slug
            },
            "issuer": issuer
        })
    }

    fn microsoft_issuer() -> Value {
        json!({
            "summary": "issued by Microsoft",
            "entities": [
                {"label": "Issued by", "primary": true, "entity": {"type": "Organization", "name": "Microsoft"}}
            ]
        })
    }

    #[test]
    fn parses_badge_fields() {
        let doc = json!({"data": [badge(
            "Azure Fundamentals",
            "microsoft-certified-azure-fundamentals",
            "2023-05-01",
            microsoft_issuer(),
        )]});
        let badges = parse_badges(&doc).unwrap();
        assert_eq!(
            badges,
            vec![RawBadge {
                title: "Azure Fundamentals".into(),
                slug: "microsoft-certified-azure-fundamentals".into(),
                issuer: "Microsoft".into(),
                date: "2023-05-01".into(),
            }]
        );
    }

    #[test]
    fn primary_entity_beats_first_entity() {
        let issuer = json!({
            "entities": [
                {"primary": false, "entity": {"name": "Pearson VUE"}},
                {"primary": true, "entity": {"name": "Microsoft"}}
            ]
        });
        assert_eq!(issuer_name(&issuer), "Microsoft");
    }

    #[test]
    fn first_entity_used_without_primary() {
        let issuer = json!({
            "entities": [
                {"entity": {"name": "GitHub"}},
                {"entity": {"name": "Microsoft"}}
            ]
        });
        assert_eq!(issuer_name(&issuer), "GitHub");
    }

    #[test]
    fn summary_prefix_is_stripped_case_insensitively() {
        let issuer = json!({"summary": "Issued By Microsoft", "entities": []});
        assert_eq!(issuer_name(&issuer), "Microsoft");
    }

    #[test]
    fn empty_issuer_is_unknown() {
        let issuer = json!({"entities": []});
        assert_eq!(issuer_name(&issuer), UNKNOWN_ISSUER);

        let doc = json!({"data": [{"badge_template": {"name": "X"}}]});
        assert_eq!(parse_badges(&doc).unwrap()[0].issuer, UNKNOWN_ISSUER);
    }

    #[test]
    fn title_falls_back_to_name() {
        let doc = json!({"data": [{"name": "Legacy Badge", "badge_template": {"name": ""}}]});
        assert_eq!(parse_badges(&doc).unwrap()[0].title, "Legacy Badge");
    }

    #[test]
    fn untitled_entries_are_skipped() {
        let doc = json!({"data": [{"badge_template": {}}, "garbage", badge("A", "", "", json!({}))]});
        let badges = parse_badges(&doc).unwrap();
        assert_eq!(badges.len(), 1);
        assert_eq!(badges[0].title, "A");
    }

    #[test]
    fn issued_at_timestamp_is_truncated() {
        let doc = json!({"data": [{"badge_template": {"name": "A"}, "issued_at": "2024-02-10T08:00:00.000-05:00"}]});
        assert_eq!(parse_badges(&doc).unwrap()[0].date, "2024-02-10");
    }

    #[test]
    fn vanity_slug_used_when_earnable_id_missing() {
        let doc = json!({"data": [{"badge_template": {"name": "A", "vanity_slug": "github-copilot"}}]});
        assert_eq!(parse_badges(&doc).unwrap()[0].slug, "github-copilot");
    }

    #[test]
    fn bare_array_document_is_accepted() {
        let doc = json!([badge("A", "", "2022-01-01", json!({}))]);
        assert_eq!(parse_badges(&doc).unwrap().len(), 1);
    }

    #[test]
    fn nested_data_is_found() {
        let doc = json!({"payload": {"page": {"data": [badge("A", "", "", json!({}))]}}});
        assert_eq!(parse_badges(&doc).unwrap().len(), 1);
    }

    #[test]
    fn badge_view_keeps_every_badge_in_order() {
        let doc = json!({"data": [
            badge("Second", "", "2024-01-01", microsoft_issuer()),
            badge("First", "", "2020-01-01", json!({"entities": []})),
        ]});
        let records = CredlyBadges.extract(&doc).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title, "Second");
        assert_eq!(records[0].code, "Microsoft");
        assert_eq!(records[1].code, UNKNOWN_ISSUER);
        assert!(records.iter().all(|r| r.code_kind == CodeKind::Issuer));
    }

    #[test]
    fn exam_view_maps_and_drops() {
        let map = BadgeMap::builtin();
        let doc = json!({"data": [
            badge(
                "Azure Fundamentals",
                "microsoft-certified-azure-fundamentals",
                "2023-05-01",
                microsoft_issuer(),
            ),
            badge("Microsoft Certified: Fabric", "fabric-slug", "2024-03-03", microsoft_issuer()),
            badge("AWS Cloud Practitioner", "aws-ccp", "2021-01-01", json!({})),
        ]});
        let records = CredlyExams::new(&map).extract(&doc).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0],
            CanonicalRecord::new(
                "Azure Fundamentals",
                "AZ-900",
                "2023-05-01",
                Source::Credly,
                CodeKind::Exact,
            )
        );
        assert_eq!(records[1].code, "Badge: fabric-slug");
        assert_eq!(records[1].code_kind, CodeKind::Fallback);
    }

    #[test]
    fn empty_data_yields_no_records() {
        let records = CredlyBadges.extract(&json!({"data": []})).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn missing_data_is_malformed() {
        let err = CredlyBadges.extract(&json!({"error": "not found"})).unwrap_err();
        assert!(matches!(err, SyncError::MalformedResponse { origin: Source::Credly, .. }));
    }
}
