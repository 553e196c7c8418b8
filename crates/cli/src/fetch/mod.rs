//! Fetch commands: pull credentials from public sources into CSV.
//!
//! - `badges`: one Credly profile, badge view
//! - `exams`: Microsoft Learn transcript merged with mapped Credly badges
//! - `catalog`: active exams from the Microsoft Learn catalog

mod common;
mod credly;
mod exams;
mod learn;

use std::time::Duration;

use clap::Args;

pub use credly::{cmd_badges, CREDLY_API_BASE};
pub use exams::cmd_exams;
pub use learn::{cmd_catalog, LEARN_API_BASE};

/// Upstream base URLs. Hidden: only mock servers need to override them.
#[derive(Args, Debug, Clone)]
pub struct Endpoints {
    /// Credly base URL
    #[arg(
        long,
        env = "CERTSYNC_CREDLY_URL",
        default_value = CREDLY_API_BASE,
        hide = true,
        global = true
    )]
    pub credly_url: String,

    /// Microsoft Learn base URL
    #[arg(
        long,
        env = "CERTSYNC_LEARN_URL",
        default_value = LEARN_API_BASE,
        hide = true,
        global = true
    )]
    pub learn_url: String,
}

/// Settings shared by every fetch command.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub quiet: bool,
    pub timeout: Duration,
    pub endpoints: Endpoints,
}
