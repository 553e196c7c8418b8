// certsync CLI - collect passed exams and badges into CSV
// Exit codes are documented in exit_codes.rs

mod exit_codes;
mod fetch;
mod report;
mod settings;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use certsync_recon::SyncError;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use exit_codes::{sync_exit_code, EXIT_IO, EXIT_SUCCESS, EXIT_USAGE};
use fetch::{Endpoints, RunContext};

const DEFAULT_LOCALE: &str = "en-us";

#[derive(Parser)]
#[command(name = "certsync")]
#[command(about = "Collect passed certification exams and digital badges into CSV")]
#[command(version)]
struct Cli {
    /// Suppress progress and summary output on stderr
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    /// Raise log verbosity (-v info, -vv debug). RUST_LOG takes precedence
    #[arg(short = 'v', action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Per-request HTTP timeout in seconds
    #[arg(long, default_value_t = 30, global = true,
          value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: u64,

    #[command(flatten)]
    endpoints: Endpoints,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export the public badges of a Credly profile
    #[command(after_help = "\
Examples:
  certsync badges jdoe
  certsync badges jdoe --out badges.csv
  certsync badges jdoe --out - | column -s, -t")]
    Badges {
        /// Credly username
        username: String,

        /// Output CSV path, `-` for stdout (default: credly_badges_<username>.csv)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Export passed exams from a shared Microsoft Learn transcript,
    /// completed by exam-related Credly badges
    #[command(after_help = "\
Examples:
  certsync exams d8yjji2wxnj6lk
  certsync exams d8yjji2wxnj6lk --credly-user jdoe
  certsync exams d8yjji2wxnj6lk --credly-user jdoe --badge-map ~/badges.toml --out exams.csv
  LOCALE=de-de certsync exams d8yjji2wxnj6lk")]
    Exams {
        /// Transcript share ID (the last path segment of the share link)
        share_id: String,

        /// Credly username to merge badges from
        #[arg(long)]
        credly_user: Option<String>,

        /// Transcript locale
        #[arg(long, env = "LOCALE", default_value = DEFAULT_LOCALE)]
        locale: String,

        /// Output CSV path, `-` for stdout (default: passed_exams_<share_id>.csv)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Badge-to-exam mapping file (TOML). Default: <config dir>/certsync/badge_map.toml
        #[arg(long, env = "CERTSYNC_BADGE_MAP")]
        badge_map: Option<PathBuf>,
    },

    /// List exams that can still be taken, from the Microsoft Learn catalog
    #[command(after_help = "\
Examples:
  certsync catalog
  certsync catalog --locale fr-fr --out exams.csv")]
    Catalog {
        /// Catalog locale
        #[arg(long, env = "LOCALE", default_value = DEFAULT_LOCALE)]
        locale: String,

        /// Output CSV path, `-` for stdout (default: stdout)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = RunContext {
        quiet: cli.quiet,
        timeout: Duration::from_secs(cli.timeout_secs),
        endpoints: cli.endpoints,
    };

    let result = match cli.command {
        Commands::Badges { username, out } => fetch::cmd_badges(username, out, &ctx),
        Commands::Exams {
            share_id,
            credly_user,
            locale,
            out,
            badge_map,
        } => fetch::cmd_exams(share_id, credly_user, locale, out, badge_map, &ctx),
        Commands::Catalog { locale, out } => fetch::cmd_catalog(locale, out, &ctx),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

/// Log to stderr. `RUST_LOG` wins; otherwise `-v` picks the level.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init()
        .ok();
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<SyncError> for CliError {
    fn from(err: SyncError) -> Self {
        let code = sync_exit_code(&err);
        let hint = match &err {
            SyncError::Transport { .. } => {
                Some("check network access, or rerun with -v for request details".to_string())
            }
            SyncError::Decode { .. } | SyncError::MalformedResponse { .. } => {
                Some("the upstream format may have changed; rerun with -vv to inspect".to_string())
            }
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }
}
