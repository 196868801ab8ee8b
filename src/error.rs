use thiserror::Error;

use crate::fetch::FetchError;

/// Failures that end a run before anything is written.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("URL must include scheme and host (e.g., https://example.com).")]
    InvalidUrl,
    #[error(transparent)]
    Fetch(#[from] FetchError),
}
