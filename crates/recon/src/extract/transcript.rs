//! Microsoft Learn shared transcript (`/api/profiles/transcript/share/<id>`).

use serde_json::Value;
use tracing::debug;

use crate::error::SyncError;
use crate::model::{CanonicalRecord, CodeKind, Source};

use super::{date_part, find_array, first_text, locate_entries, Extractor, Locator};

const PASSED_EXAMS_KEY: &str = "passedExams";

const LOCATORS: &[Locator] = &[top_level_passed_exams, nested_passed_exams];

fn is_passed_exams_key(key: &str) -> bool {
    key.eq_ignore_ascii_case(PASSED_EXAMS_KEY)
}

fn top_level_passed_exams(doc: &Value) -> Option<&Vec<Value>> {
    doc.as_object()?
        .iter()
        .find(|(key, value)| is_passed_exams_key(key) && value.is_array())
        .and_then(|(_, value)| value.as_array())
}

fn nested_passed_exams(doc: &Value) -> Option<&Vec<Value>> {
    find_array(doc, &is_passed_exams_key)
}

/// Passed exams from a shared transcript. Field names are matched
/// case-insensitively (`examTitle` and `ExamTitle` both occur).
#[derive(Debug, Default, Clone, Copy)]
pub struct LearnTranscript;

impl LearnTranscript {
    fn to_record(entry: &Value) -> Option<CanonicalRecord> {
        if !entry.is_object() {
            return None;
        }
        let code = first_text(entry, &["examNumber"]);
        let mut title = first_text(entry, &["examTitle"]);
        if title.is_empty() {
            title = code.clone();
        }
        if title.is_empty() {
            return None;
        }
        let date = date_part(&first_text(entry, &["examDateTaken"]));
        let kind = if code.is_empty() {
            CodeKind::Fallback
        } else {
            CodeKind::Exact
        };
        Some(CanonicalRecord::new(title, code, date, Source::MicrosoftLearn, kind))
    }
}

impl Extractor for LearnTranscript {
    fn source(&self) -> Source {
        Source::MicrosoftLearn
    }

    fn extract(&self, doc: &Value) -> Result<Vec<CanonicalRecord>, SyncError> {
        let entries = locate_entries(Source::MicrosoftLearn, doc, LOCATORS)?;
        let records: Vec<_> = entries.iter().filter_map(Self::to_record).collect();
        if records.len() < entries.len() {
            debug!(
                skipped = entries.len() - records.len(),
                "skipped transcript entries without title or exam number"
            );
        }
        Ok(records)
    }
}
