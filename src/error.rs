use thiserror::Error;

use crate::authz::AccessDenied;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Every way a request can be blocked by the gate.
///
/// None of these is recovered internally: the interceptor raises them to its caller as soon
/// as they happen, and the request is not forwarded.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid Kubernetes resource URI path: {path}")]
    MalformedPath { path: String },

    #[error("could not calculate Kubernetes resource verb for {method} on {target}")]
    UnsupportedMethod { method: String, target: String },

    #[error(transparent)]
    AccessDenied(#[from] AccessDenied),

    /// The authorization oracle could not answer. Not a denial.
    #[error(transparent)]
    Oracle(anyhow::Error),

    #[error("forward request: {0}")]
    Forward(#[source] reqwest::Error),
}

impl Error {
    pub(crate) fn malformed_path(path: impl Into<String>) -> Self {
        Self::MalformedPath { path: path.into() }
    }
}
