//! Engine error types.

use std::path::PathBuf;

use autofill_dom::DomError;
use thiserror::Error;

/// Errors raised outside the fill pass itself.
///
/// A fill pass never returns one of these: per-field failures end up in the
/// observation log and a missing profile in `FillResult::success`.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("No profile data loaded")]
    NoProfileData,

    #[error("Failed to load profile from {path}: {message}")]
    ProfileLoad { path: PathBuf, message: String },

    #[error("DOM error: {0}")]
    Dom(#[from] DomError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
