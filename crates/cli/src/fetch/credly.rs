//! Credly adapter for `certsync badges`.
//!
//! Fetches the public badge list of a Credly profile. The same client
//! feeds the secondary source of `certsync exams`.
//!
//! # API
//!
//! - `GET /users/{username}/badges.json`: public, no auth
//! - Returns `{"data": [...]}` in practice; older payloads were a bare
//!   array, and the extractor copes with both.

use std::path::PathBuf;
use std::time::Duration;

use certsync_recon::extract::CredlyBadges;
use certsync_recon::{CanonicalRecord, Extractor, Source, Summary, SyncError};
use serde::Serialize;
use serde_json::Value;

use super::common::{self, FetchClient, Output};
use super::RunContext;
use crate::{report, CliError};

// ── Constants ───────────────────────────────────────────────────────

pub const CREDLY_API_BASE: &str = "https://www.credly.com";

pub(super) const BADGE_HEADER: [&str; 3] = ["Badge Title", "Issuer", "Issue Date"];

// ── Client ──────────────────────────────────────────────────────────

pub(super) struct CredlyClient {
    client: FetchClient,
    base_url: String,
}

impl CredlyClient {
    pub(super) fn from_context(ctx: &RunContext) -> Result<Self, CliError> {
        common::check_base_url(&ctx.endpoints.credly_url, "--credly-url")?;
        Ok(Self::with_base_url(ctx.endpoints.credly_url.clone(), ctx.timeout)?)
    }

    pub(super) fn with_base_url(base_url: String, timeout: Duration) -> Result<Self, SyncError> {
        Ok(Self {
            client: FetchClient::new(Source::Credly, timeout)?,
            base_url,
        })
    }

    pub(super) fn fetch_badges(&self, username: &str) -> Result<Value, SyncError> {
        let url = common::endpoint(&self.base_url, &["users", username, "badges.json"])?;
        self.client.get_json(&url)
    }
}

// ── CSV row ─────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct BadgeRow<'a> {
    title: &'a str,
    issuer: &'a str,
    date: &'a str,
}

impl<'a> From<&'a CanonicalRecord> for BadgeRow<'a> {
    fn from(record: &'a CanonicalRecord) -> Self {
        // The badge view keeps the issuer in `code`.
        Self {
            title: &record.title,
            issuer: &record.code,
            date: &record.date,
        }
    }
}

// ── Command ─────────────────────────────────────────────────────────

pub fn cmd_badges(
    username: String,
    out: Option<PathBuf>,
    ctx: &RunContext,
) -> Result<(), CliError> {
    // 1. Validate input, resolve output
    let username = common::require_identifier(&username, "Credly username")?;
    let output = Output::resolve(out, Some(format!("credly_badges_{}.csv", username)));

    // 2. Fetch
    let client = CredlyClient::from_context(ctx)?;
    if common::show_progress(ctx.quiet) {
        eprintln!("Fetching Credly badges for {}...", username);
    }
    let doc = client.fetch_badges(&username)?;

    // 3. Extract (document order, no dedup)
    let records = CredlyBadges.extract(&doc)?;
    if records.is_empty() {
        return Err(CliError::from(SyncError::NoRecordsFound)
            .with_hint("check that the Credly profile exists and its badges are public"));
    }

    // 4. Write CSV
    let rows: Vec<BadgeRow> = records.iter().map(BadgeRow::from).collect();
    let out_label = common::write_csv(&rows, &BADGE_HEADER, &output)?;

    if !ctx.quiet {
        report::print_written(records.len(), "badge records", &out_label);
        report::print_summary(&Summary::from_records(&records), "issuer");
    }

    Ok(())
}

// ── Tests ───────────────────────────────────────────────────────────
