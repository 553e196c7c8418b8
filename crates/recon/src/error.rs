use thiserror::Error;

use crate::model::Source;

#[derive(Debug, Error)]
pub enum SyncError {
    /// Network failure or non-2xx status reaching a source.
    #[error("{origin} unavailable: {message}")]
    Transport { origin: Source, message: String },
    /// Response body was not valid JSON.
    #[error("{origin} returned invalid JSON: {message}")]
    Decode { origin: Source, message: String },
    /// Valid JSON, but the expected structure is missing entirely.
    #[error("{origin} response is malformed: {message}")]
    MalformedResponse { origin: Source, message: String },
    /// Every source responded, but nothing survived extraction.
    #[error("no records found from any source")]
    NoRecordsFound,
    /// Badge map / retirement policy could not be loaded.
    #[error("config error: {0}")]
    Config(String),
    /// IO error (file read, etc.).
    #[error("IO error: {0}")]
    Io(String),
}

impl SyncError {
    pub(crate) fn malformed(origin: Source, message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            origin,
            message: message.into(),
        }
    }

    /// The source this error is attributed to, if any.
    pub fn origin(&self) -> Option<Source> {
        match self {
            Self::Transport { origin, .. }
            | Self::Decode { origin, .. }
            | Self::MalformedResponse { origin, .. } => Some(*origin),
            _ => None,
        }
    }
}
