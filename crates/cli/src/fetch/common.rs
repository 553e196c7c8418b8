//! Shared infrastructure for the fetch commands.
//!
//! Each command (badges, exams, catalog) reuses:
//! - `FetchClient`: blocking HTTP client with timeout and error classification
//! - `endpoint`: base URL plus percent-encoded path segments
//! - `require_identifier`: reject blank usernames, share IDs and locales
//! - `Output` / `write_csv`: stdout or an atomically replaced file
//!
//! # CSV Contract
//!
//! - **Header**: always written first, even with zero rows.
//! - **Terminator**: `\n`. Quoting and escaping are left to the `csv` crate.
//! - **Absent values**: empty string, never omitted. Every row has the same
//!   number of columns as the header.
//! - **Files**: written to `<path>.partial`, then renamed. A failed write
//!   never leaves a truncated file under the final name.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use certsync_recon::extract;
use certsync_recon::{Source, SyncError};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};
use url::Url;

use crate::CliError;

// ── Constants ───────────────────────────────────────────────────────

pub(super) const USER_AGENT: &str = concat!("certsync/", env!("CARGO_PKG_VERSION"));

const PARTIAL_SUFFIX: &str = ".partial";

// ── FetchClient ─────────────────────────────────────────────────────

/// Shared HTTP client that handles timeouts and error classification.
///
/// There is no retry loop: a failed request is reported once, attributed
/// to the source that owns the client.
pub(super) struct FetchClient {
    http: reqwest::blocking::Client,
    source: Source,
}

impl FetchClient {
    pub(super) fn new(source: Source, timeout: Duration) -> Result<Self, SyncError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| SyncError::Transport {
                origin: source,
                message: format!("cannot build HTTP client: {}", e),
            })?;

        Ok(Self { http, source })
    }

    /// GET `url` and decode the body as JSON.
    ///
    /// Network failures and non-2xx statuses are `Transport` errors; a
    /// body that is not JSON is a `Decode` error. A leading UTF-8 BOM is
    /// tolerated.
    pub(super) fn get_json(&self, url: &Url) -> Result<Value, SyncError> {
        info!(source = %self.source, %url, "fetching");

        let resp = self
            .http
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .map_err(|e| self.transport(describe_send_error(&e)))?;

        let status = resp.status();
        let text = resp
            .text()
            .map_err(|e| self.transport(format!("failed to read response body: {}", e)))?;

        if !status.is_success() {
            return Err(self.transport(format!(
                "HTTP {} ({})",
                status.as_u16(),
                error_message(&text),
            )));
        }

        debug!(source = %self.source, bytes = text.len(), "response received");
        extract::decode(self.source, &text)
    }

    fn transport(&self, message: String) -> SyncError {
        SyncError::Transport {
            origin: self.source,
            message,
        }
    }
}

fn describe_send_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("request timed out: {}", e)
    } else if e.is_connect() {
        format!("connection failed: {}", e)
    } else {
        e.to_string()
    }
}

/// Best-effort message from an error response body.
fn error_message(body: &str) -> String {
    let trimmed = body.trim_start_matches('\u{feff}').trim();
    if trimmed.is_empty() {
        return "empty body".to_string();
    }

    if let Ok(json) = serde_json::from_str::<Value>(trimmed) {
        for pointer in ["/message", "/error", "/error_description", "/data/message"] {
            if let Some(msg) = json.pointer(pointer).and_then(Value::as_str) {
                return msg.to_string();
            }
        }
    }

    match trimmed.char_indices().nth(200) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}

// ── Endpoints ───────────────────────────────────────────────────────

/// Append `segments` to `base`, percent-encoding each one as a single
/// path segment. An empty trailing segment yields a trailing slash.
pub(super) fn endpoint(base: &str, segments: &[&str]) -> Result<Url, SyncError> {
    let mut url = Url::parse(base)
        .map_err(|e| SyncError::Config(format!("invalid base URL '{}': {}", base, e)))?;

    url.path_segments_mut()
        .map_err(|_| SyncError::Config(format!("base URL '{}' cannot carry a path", base)))?
        .pop_if_empty()
        .extend(segments);

    Ok(url)
}

/// Base URLs come from flags or the environment. A bad one is a usage error.
pub(super) fn check_base_url(base: &str, flag: &str) -> Result<(), CliError> {
    match Url::parse(base) {
        Ok(url) if !url.cannot_be_a_base() => Ok(()),
        Ok(_) => Err(CliError::args(format!("{} '{}' cannot carry a path", flag, base))),
        Err(e) => Err(CliError::args(format!("invalid {} '{}': {}", flag, base, e))),
    }
}

/// Identifiers must be non-empty after trimming. The value itself is
/// passed through untouched.
pub(super) fn require_identifier(value: &str, what: &str) -> Result<String, CliError> {
    if value.trim().is_empty() {
        return Err(CliError::args(format!("{} must not be empty", what)));
    }
    Ok(value.to_string())
}

pub(super) fn show_progress(quiet: bool) -> bool {
    !quiet && atty::is(atty::Stream::Stderr)
}

// ── Output ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Output {
    Stdout,
    File(PathBuf),
}

impl Output {
    /// `--out -` is stdout; no `--out` falls back to `default`, or stdout
    /// when the command has no default file name.
    pub(super) fn resolve(out: Option<PathBuf>, default: Option<String>) -> Self {
        match out {
            Some(path) if path.as_os_str() == "-" => Output::Stdout,
            Some(path) => Output::File(path),
            None => default.map_or(Output::Stdout, |name| Output::File(PathBuf::from(name))),
        }
    }

    pub(super) fn label(&self) -> String {
        match self {
            Output::Stdout => "stdout".to_string(),
            Output::File(path) => path.display().to_string(),
        }
    }
}

// ── CSV output ──────────────────────────────────────────────────────

/// Write `header` and `rows` to `out`. Returns the destination label.
pub(super) fn write_csv<R: Serialize>(
    rows: &[R],
    header: &[&str],
    out: &Output,
) -> Result<String, CliError> {
    match out {
        Output::Stdout => write_rows(std::io::stdout().lock(), rows, header)?,
        Output::File(path) => {
            let partial = partial_path(path);
            let f = fs::File::create(&partial).map_err(|e| {
                CliError::io(format!("cannot create {}: {}", partial.display(), e))
            })?;

            if let Err(e) = write_rows(std::io::BufWriter::new(f), rows, header) {
                let _ = fs::remove_file(&partial);
                return Err(e);
            }

            fs::rename(&partial, path).map_err(|e| {
                let _ = fs::remove_file(&partial);
                CliError::io(format!("cannot move output into {}: {}", path.display(), e))
            })?;
        }
    }

    debug!(rows = rows.len(), out = %out.label(), "csv written");
    Ok(out.label())
}

fn write_rows<W: Write, R: Serialize>(
    writer: W,
    rows: &[R],
    header: &[&str],
) -> Result<(), CliError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    csv_writer
        .write_record(header)
        .map_err(|e| CliError::io(format!("CSV write error: {}", e)))?;

    for row in rows {
        csv_writer
            .serialize(row)
            .map_err(|e| CliError::io(format!("CSV write error: {}", e)))?;
    }

    csv_writer
        .flush()
        .map_err(|e| CliError::io(format!("CSV flush error: {}", e)))
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(PARTIAL_SUFFIX);
    path.with_file_name(name)
}

// ── Tests ───────────────────────────────────────────────────────────
