//! Microsoft Learn exam catalog (`/api/catalog/?type=exams`), reduced to
//! exams that can still be taken.

use std::collections::HashSet;

use serde::Serialize;
use serde_json::Value;

use crate::error::SyncError;
use crate::extract::{first_text, text_of};
use crate::model::Source;

const RETIRED_EXAMS: &[&str] = &[
    "70-333", "70-334", "70-339", "70-345", "70-357", "70-410", "70-411", "70-412", "70-413",
    "70-414", "70-417", "70-461", "70-462", "70-463", "70-464", "70-465", "70-466", "70-467",
    "70-480", "70-483", "70-486", "70-487", "70-537", "70-705", "70-740", "70-741", "70-742",
    "70-743", "70-744", "70-745", "70-761", "70-762", "70-764", "70-765", "70-767", "70-768",
    "70-777", "70-778", "70-779", "70-797", "77-601", "77-602", "77-881", "77-882", "77-883",
    "77-884", "77-885", "77-887", "77-888", "98-349", "98-361", "98-364", "98-365", "98-366",
    "98-367", "98-368", "98-375", "98-381", "98-382", "98-383", "98-388", "AI-100", "AZ-100",
    "AZ-101", "AZ-102", "AZ-103", "AZ-200", "AZ-201", "AZ-202", "AZ-203", "AZ-220", "AZ-300",
    "AZ-301", "AZ-302", "AZ-303", "AZ-304", "AZ-600", "AZ-720", "DA-100", "DP-200", "DP-201",
    "MB-200", "MB-210", "MB-220", "MB-300", "MB-320", "MB-340", "MB-400", "MB-600", "MB-900",
    "MB-901", "MB2-716", "MB6-894", "MB6-897", "MB6-898", "MD-100", "MD-101", "MS-100", "MS-101",
    "MS-200", "MS-201", "MS-202", "MS-203", "MS-220", "MS-300", "MS-301", "MS-302", "MS-500",
    "MS-600", "MS-720", "MS-740",
];

const RETIRED_PREFIXES: &[&str] = &["MB6", "98", "77", "MO"];

/// Which catalog entries count as retired.
#[derive(Debug, Clone)]
pub struct RetirementPolicy {
    pub codes: HashSet<String>,
    pub prefixes: Vec<String>,
}

impl Default for RetirementPolicy {
    fn default() -> Self {
        Self {
            codes: RETIRED_EXAMS.iter().map(|c| c.to_string()).collect(),
            prefixes: RETIRED_PREFIXES.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl RetirementPolicy {
    pub fn is_retired(&self, code: &str) -> bool {
        self.codes.contains(code) || self.prefixes.iter().any(|p| code.starts_with(p.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogExam {
    pub code: String,
    pub title: String,
    pub levels: Vec<String>,
}

/// Active exams in catalog order. Entries without a code are skipped.
pub fn active_exams(doc: &Value, policy: &RetirementPolicy) -> Result<Vec<CatalogExam>, SyncError> {
    let exams = doc
        .get("exams")
        .and_then(Value::as_array)
        .ok_or_else(|| SyncError::MalformedResponse {
            origin: Source::MicrosoftLearn,
            message: "catalog response has no 'exams' array".into(),
        })?;

    Ok(exams
        .iter()
        .filter_map(|exam| {
            let code = first_text(exam, &["display_name"]);
            if code.is_empty() || policy.is_retired(&code) {
                return None;
            }
            let levels = exam
                .get("levels")
                .and_then(Value::as_array)
                .map(|ls| ls.iter().filter_map(text_of).collect())
                .unwrap_or_default();
            Some(CatalogExam {
                title: first_text(exam, &["title"]),
                code,
                levels,
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn filters_retired_codes_and_prefixes() {
        let doc = json!({"exams": [
            {"display_name": "AZ-900", "title": "Azure Fundamentals", "levels": ["beginner"]},
            {"display_name": "AZ-103", "title": "Retired admin"},
            {"display_name": "MB6-999", "title": "Prefix retired"},
            {"display_name": "MO-200", "title": "Office specialist"},
            {"display_name": "AZ-104", "title": "Azure Administrator", "levels": ["intermediate", "advanced"]},
            {"title": "No code"}
        ]});
        let exams = active_exams(&doc, &RetirementPolicy::default()).unwrap();
        let codes: Vec<_> = exams.iter().map(|e| e.code.as_str()).collect();
        assert_eq!(codes, vec!["AZ-900", "AZ-104"]);
        assert_eq!(exams[1].levels, vec!["intermediate", "advanced"]);
    }

    #[test]
    fn missing_exams_is_malformed() {
        let err = active_exams(&json!({"modules": []}), &RetirementPolicy::default()).unwrap_err();
        assert!(matches!(err, SyncError::MalformedResponse { .. }));
    }

    #[test]
    fn custom_policy() {
        let policy = RetirementPolicy {
            codes: HashSet::from(["AZ-900".to_string()]),
            prefixes: vec![],
        };
        let doc = json!({"exams": [{"display_name": "AZ-900"}, {"display_name": "98-361"}]});
        let exams = active_exams(&doc, &policy).unwrap();
        assert_eq!(exams.len(), 1);
        assert_eq!(exams[0].code, "98-361");
        assert_eq!(exams[0].title, "");
    }
}
