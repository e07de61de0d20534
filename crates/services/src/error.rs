//! Shared error types for the services crate.

use thiserror::Error;

use course_core::model::IncompleteProjectsReport;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by a `ContentApi` implementation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ContentApiError {
    #[error("not found")]
    NotFound,
    /// Course completion was refused because some projects still block it.
    #[error("{} project(s) must be finished before completing the course", .0.len())]
    IncompleteProjects(IncompleteProjectsReport),
    /// The server refused the request; the message is shown to the learner as-is.
    #[error("{0}")]
    Rejected(String),
    #[error("request failed with status {status}")]
    HttpStatus { status: u16 },
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ContentApiError {
    #[must_use]
    pub fn incomplete_projects(&self) -> Option<&IncompleteProjectsReport> {
        match self {
            Self::IncompleteProjects(report) => Some(report),
            _ => None,
        }
    }
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("invalid API base url: {0}")]
    InvalidBaseUrl(String),
}
