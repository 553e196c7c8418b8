//! Microsoft Learn adapter.
//!
//! Two public endpoints, no auth:
//! - `GET /api/profiles/transcript/share/{share_id}?locale={locale}`:
//!   shared transcript, primary source of `certsync exams`
//! - `GET /api/catalog/?type=exams&locale={locale}`: exam catalog for
//!   `certsync catalog`

use std::path::PathBuf;
use std::time::Duration;

use certsync_recon::catalog::{active_exams, CatalogExam, RetirementPolicy};
use certsync_recon::{Source, SyncError};
use serde::Serialize;
use serde_json::Value;

use super::common::{self, FetchClient, Output};
use super::RunContext;
use crate::{report, CliError};

// ── Constants ───────────────────────────────────────────────────────

pub const LEARN_API_BASE: &str = "https://learn.microsoft.com";

pub(super) const CATALOG_HEADER: [&str; 3] = ["Exam Code", "Title", "Levels"];

// ── Client ──────────────────────────────────────────────────────────

pub(super) struct LearnClient {
    client: FetchClient,
    base_url: String,
}

impl LearnClient {
    pub(super) fn from_context(ctx: &RunContext) -> Result<Self, CliError> {
        common::check_base_url(&ctx.endpoints.learn_url, "--learn-url")?;
        Ok(Self::with_base_url(ctx.endpoints.learn_url.clone(), ctx.timeout)?)
    }

    pub(super) fn with_base_url(base_url: String, timeout: Duration) -> Result<Self, SyncError> {
        Ok(Self {
            client: FetchClient::new(Source::MicrosoftLearn, timeout)?,
            base_url,
        })
    }

    pub(super) fn fetch_transcript(
        &self,
        share_id: &str,
        locale: &str,
    ) -> Result<Value, SyncError> {
        let mut url = common::endpoint(
            &self.base_url,
            &["api", "profiles", "transcript", "share", share_id],
        )?;
        url.query_pairs_mut().append_pair("locale", locale);
        self.client.get_json(&url)
    }

    pub(super) fn fetch_catalog(&self, locale: &str) -> Result<Value, SyncError> {
        let mut url = common::endpoint(&self.base_url, &["api", "catalog", ""])?;
        url.query_pairs_mut()
            .append_pair("type", "exams")
            .append_pair("locale", locale);
        self.client.get_json(&url)
    }
}

// ── CSV row ─────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct CatalogRow<'a> {
    code: &'a str,
    title: &'a str,
    levels: String,
}

impl<'a> From<&'a CatalogExam> for CatalogRow<'a> {
    fn from(exam: &'a CatalogExam) -> Self {
        Self {
            code: &exam.code,
            title: &exam.title,
            levels: exam.levels.join(", "),
        }
    }
}

// ── Command ─────────────────────────────────────────────────────────

pub fn cmd_catalog(locale: String, out: Option<PathBuf>, ctx: &RunContext) -> Result<(), CliError> {
    let locale = common::require_identifier(&locale, "locale")?;
    let output = Output::resolve(out, None);

    let client = LearnClient::from_context(ctx)?;
    if common::show_progress(ctx.quiet) {
        eprintln!("Fetching Microsoft Learn exam catalog ({})...", locale);
    }
    let doc = client.fetch_catalog(&locale)?;

    let exams = active_exams(&doc, &RetirementPolicy::default())?;
    let rows: Vec<CatalogRow> = exams.iter().map(CatalogRow::from).collect();
    let out_label = common::write_csv(&rows, &CATALOG_HEADER, &output)?;

    if !ctx.quiet {
        report::print_written(exams.len(), "active exams", &out_label);
    }

    Ok(())
}

// ── Tests ───────────────────────────────────────────────────────────
