//! `certsync-recon`: credential extraction and multi-source reconciliation.
//!
//! Pure engine crate: receives already-parsed JSON documents, returns
//! canonical records, merged lists and summaries. No network or CLI
//! dependencies.

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod evidence;
pub mod extract;
pub mod matcher;
pub mod model;

pub use config::BadgeMap;
pub use engine::reconcile;
pub use error::SyncError;
pub use evidence::Summary;
pub use extract::Extractor;
pub use model::{CanonicalRecord, CodeKind, DedupeKey, Reconciled, Source, SourceBatch};
