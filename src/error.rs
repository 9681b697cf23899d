//! Error types for schedule lookups and feed loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced to the presentation layer.
///
/// Filtering and grouping never produce these; they come from lookups by id
/// and from the feed loader.
#[derive(Error, Debug)]
pub enum ScheduleError {
    /// A required id or parameter was not supplied.
    #[error("No {0} id provided")]
    MissingData(&'static str),

    #[error("No {kind} found for id {id}")]
    NotFound { kind: &'static str, id: i64 },

    #[error("Failed to load feed `{}`: {source}", .path.display())]
    UpstreamFailure {
        path: PathBuf,
        #[source]
        source: FeedError,
    },
}

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Deserialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScheduleError {
    /// The user-visible message for this error class. Lookup misses and feed
    /// failures share a generic message; missing input gets its own.
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingData(_) => self.to_string(),
            Self::NotFound { .. } | Self::UpstreamFailure { .. } => {
                "Something went wrong loading the schedule".to_string()
            }
        }
    }
}
