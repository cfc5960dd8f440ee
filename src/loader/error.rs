//! Loader errors.

use thiserror::Error;

/// A failed sprite load.
///
/// `Clone` so one failed fetch can be handed to every caller waiting on it.
/// Nothing is cached on failure; the next request for the namespace retries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("failed to fetch sprite `{namespace}`: {message}")]
    Fetch { namespace: String, message: String },

    #[error("sprite `{namespace}` request returned HTTP {status}")]
    Status { namespace: String, status: u16 },

    #[error("sprite `{namespace}` rejected: {reason}")]
    InvalidContent { namespace: String, reason: String },

    #[error("icon `{icon}` not found in sprite `{namespace}`")]
    UnknownIcon { namespace: String, icon: String },

    #[error("load of sprite `{namespace}` ended without a result")]
    Abandoned { namespace: String },
}
