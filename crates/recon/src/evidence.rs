use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::model::{CanonicalRecord, Source};

/// Summary statistics over a record list.
///
/// Ties are broken by input order: `latest` is the first record holding
/// the maximum date, `top_code` the code that appears first among those
/// sharing the maximum count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub distinct_years: usize,
    pub latest: Option<CanonicalRecord>,
    pub top_code: Option<CodeCount>,
    pub by_source: Vec<(Source, usize)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeCount {
    pub code: String,
    pub count: usize,
}

impl Summary {
    pub fn from_records(records: &[CanonicalRecord]) -> Self {
        let years: BTreeSet<&str> = records.iter().filter_map(CanonicalRecord::year).collect();

        let mut latest: Option<&CanonicalRecord> = None;
        for record in records.iter().filter(|r| !r.date.is_empty()) {
            if latest.map_or(true, |best| record.date > best.date) {
                latest = Some(record);
            }
        }

        Self {
            total: records.len(),
            distinct_years: years.len(),
            latest: latest.cloned(),
            top_code: top_code(records),
            by_source: by_source(records),
        }
    }

    pub fn count_for(&self, source: Source) -> usize {
        self.by_source
            .iter()
            .find(|(s, _)| *s == source)
            .map_or(0, |(_, n)| *n)
    }
}

fn top_code(records: &[CanonicalRecord]) -> Option<CodeCount> {
    // Counts in first-appearance order.
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for record in records.iter().filter(|r| !r.code.is_empty()) {
        let code = record.code.as_str();
        match index.get(code) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(code, counts.len());
                counts.push((code, 1));
            }
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (code, count) in counts {
        if best.map_or(true, |(_, n)| count > n) {
            best = Some((code, count));
        }
    }

    best.map(|(code, count)| CodeCount {
        code: code.to_string(),
        count,
    })
}

fn by_source(records: &[CanonicalRecord]) -> Vec<(Source, usize)> {
    Source::ALL
        .iter()
        .map(|&s| (s, records.iter().filter(|r| r.source == s).count()))
        .filter(|(_, n)| *n > 0)
        .collect()
}
