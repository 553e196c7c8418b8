//! `certsync exams`: passed exams from Microsoft Learn, completed by
//! exam-related Credly badges.
//!
//! Microsoft Learn is the primary source: any failure there aborts the
//! run. Credly is secondary: a failure becomes a `warning:` line and the
//! run continues with transcript records only.

use std::path::PathBuf;
use std::thread;

use certsync_recon::extract::{CredlyExams, LearnTranscript};
use certsync_recon::{
    reconcile, CanonicalRecord, Extractor, Source, SourceBatch, Summary, SyncError,
};
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use super::common::{self, Output};
use super::credly::CredlyClient;
use super::learn::LearnClient;
use super::RunContext;
use crate::{report, settings, CliError};

pub(super) const EXAM_HEADER: [&str; 4] = ["Exam Title", "Exam Number", "Exam Date", "Source"];

#[derive(Debug, Serialize)]
struct ExamRow<'a> {
    title: &'a str,
    code: &'a str,
    date: &'a str,
    source: &'static str,
}

impl<'a> From<&'a CanonicalRecord> for ExamRow<'a> {
    fn from(record: &'a CanonicalRecord) -> Self {
        Self {
            title: &record.title,
            code: &record.code,
            date: &record.date,
            source: record.source.label(),
        }
    }
}

pub fn cmd_exams(
    share_id: String,
    credly_user: Option<String>,
    locale: String,
    out: Option<PathBuf>,
    badge_map: Option<PathBuf>,
    ctx: &RunContext,
) -> Result<(), CliError> {
    // 1. Validate input, load config
    let share_id = common::require_identifier(&share_id, "transcript share ID")?;
    let locale = common::require_identifier(&locale, "locale")?;
    let credly_user = credly_user
        .map(|u| common::require_identifier(&u, "Credly username"))
        .transpose()?;
    let map = settings::load_badge_map(badge_map)?;
    let output = Output::resolve(out, Some(format!("passed_exams_{}.csv", share_id)));

    let learn = LearnClient::from_context(ctx)?;
    let credly = match credly_user {
        Some(user) => Some((CredlyClient::from_context(ctx)?, user)),
        None => None,
    };

    // 2. Fetch both sources concurrently
    if common::show_progress(ctx.quiet) {
        eprintln!("Fetching Microsoft Learn transcript {}...", share_id);
        if let Some((_, user)) = &credly {
            eprintln!("Fetching Credly badges for {}...", user);
        }
    }

    let (transcript, badges) = thread::scope(|s| {
        let badges = credly
            .as_ref()
            .map(|(client, user)| s.spawn(move || client.fetch_badges(user)));
        let transcript = learn.fetch_transcript(&share_id, &locale);
        let badges = badges.map(|handle| {
            handle.join().unwrap_or_else(|_| {
                Err(SyncError::Transport {
                    origin: Source::Credly,
                    message: "fetch thread panicked".into(),
                })
            })
        });
        (transcript, badges)
    });

    // 3. Extract: primary errors are fatal, secondary errors degrade
    let learn_records = LearnTranscript.extract(&transcript?)?;
    let mut batches = vec![SourceBatch::new(Source::MicrosoftLearn, learn_records)];
    if let Some(result) = badges {
        batches.push(secondary_batch(result, &CredlyExams::new(&map)));
    }

    // 4. Merge
    let reconciled = reconcile(batches);
    if reconciled.is_empty() {
        return Err(CliError::from(SyncError::NoRecordsFound)
            .with_hint("check that the transcript is shared and the Credly profile is public"));
    }

    // 5. Write CSV
    let rows: Vec<ExamRow> = reconciled.records.iter().map(ExamRow::from).collect();
    let out_label = common::write_csv(&rows, &EXAM_HEADER, &output)?;

    if !ctx.quiet {
        report::print_written(reconciled.records.len(), "exam records", &out_label);
        report::print_breakdown(&reconciled);
        report::print_summary(&Summary::from_records(&reconciled.records), "exam");
    }

    Ok(())
}

/// Turn the secondary fetch result into a batch, degrading to an empty
/// batch on any error.
fn secondary_batch(result: Result<Value, SyncError>, extractor: &dyn Extractor) -> SourceBatch {
    let source = extractor.source();
    match result.and_then(|doc| extractor.extract(&doc)) {
        Ok(records) => SourceBatch::new(source, records),
        Err(e) => {
            warn!(%source, error = %e, "secondary source degraded");
            eprintln!("warning: could not use {} data: {}", source, e);
            SourceBatch::empty(source)
        }
    }
}
