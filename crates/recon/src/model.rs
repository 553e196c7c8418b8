use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Source
// ---------------------------------------------------------------------------

/// Upstream data source. Declaration order is the reconciliation priority:
/// earlier variants win when two sources produce the same record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Source {
    #[serde(rename = "Microsoft Learn")]
    MicrosoftLearn,
    #[serde(rename = "Credly")]
    Credly,
}

impl Source {
    /// All sources, highest priority first.
    pub const ALL: [Source; 2] = [Source::MicrosoftLearn, Source::Credly];

    /// Label written to the CSV `Source` column.
    pub fn label(&self) -> &'static str {
        match self {
            Self::MicrosoftLearn => "Microsoft Learn",
            Self::Credly => "Credly",
        }
    }

    /// Lower is stronger.
    pub fn priority(&self) -> u8 {
        match self {
            Self::MicrosoftLearn => 0,
            Self::Credly => 1,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Canonical record
// ---------------------------------------------------------------------------

/// How the `code` field of a record was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeKind {
    /// A precise exam number, either reported by the transcript or mapped
    /// from the badge table.
    Exact,
    /// A descriptive tag (`"Badge: <slug>"`) or an empty code.
    Fallback,
    /// The badge-only view stores the issuer name in `code`.
    Issuer,
}

/// The unified unit produced by every extractor.
///
/// `title` and `source` are always populated. `code` and `date` use the
/// empty string for "unknown".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalRecord {
    pub title: String,
    pub code: String,
    /// ISO-8601 calendar date (`YYYY-MM-DD`) or empty.
    pub date: String,
    pub source: Source,
    #[serde(skip)]
    pub code_kind: CodeKind,
}

impl CanonicalRecord {
    pub fn new(
        title: impl Into<String>,
        code: impl Into<String>,
        date: impl Into<String>,
        source: Source,
        code_kind: CodeKind,
    ) -> Self {
        Self {
            title: title.into(),
            code: code.into(),
            date: date.into(),
            source,
            code_kind,
        }
    }

    /// Identity used for cross-source deduplication.
    pub fn dedupe_key(&self) -> DedupeKey {
        match self.code_kind {
            CodeKind::Exact => DedupeKey::Code {
                code: self.code.clone(),
                date: self.date.clone(),
            },
            CodeKind::Fallback | CodeKind::Issuer => DedupeKey::Title {
                title: self.title.clone(),
                date: self.date.clone(),
            },
        }
    }

    /// Four-digit year prefix of `date`, if the date has one.
    pub fn year(&self) -> Option<&str> {
        let year = self.date.get(..4)?;
        year.bytes().all(|b| b.is_ascii_digit()).then_some(year)
    }
}

/// Two records are duplicates iff their keys are equal. A `Code` key never
/// equals a `Title` key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DedupeKey {
    Code { code: String, date: String },
    Title { title: String, date: String },
}

// ---------------------------------------------------------------------------
// Reconciliation input / output
// ---------------------------------------------------------------------------

/// One extractor's output, tagged with the source it came from.
#[derive(Debug, Clone)]
pub struct SourceBatch {
    pub source: Source,
    pub records: Vec<CanonicalRecord>,
}

impl SourceBatch {
    pub fn new(source: Source, records: Vec<CanonicalRecord>) -> Self {
        Self { source, records }
    }

    /// A source that failed non-fatally contributes nothing.
    pub fn empty(source: Source) -> Self {
        Self::new(source, Vec::new())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SourceTally {
    pub source: Source,
    pub kept: usize,
    pub dropped: usize,
}

/// The merged list plus per-source bookkeeping.
#[derive(Debug, Clone)]
pub struct Reconciled {
    pub records: Vec<CanonicalRecord>,
    pub tallies: Vec<SourceTally>,
}

impl Reconciled {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn tally(&self, source: Source) -> Option<&SourceTally> {
        self.tallies.iter().find(|t| t.source == source)
    }
}
