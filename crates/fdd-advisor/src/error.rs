//! Error taxonomy for the gate pipeline.
//!
//! Low-confidence retrieval is NOT represented here: it is a
//! degrade-and-continue path handled inside the engine. Errors are reserved
//! for unusable requests, missing credentials, and upstream failures.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GateError {
    /// The caller sent an unusable request (missing question, document
    /// text, etc.). Maps to HTTP 400.
    #[error("{0}")]
    InvalidRequest(String),

    /// A capability the request needs has no credential configured.
    /// Maps to HTTP 500; the message names the missing capability.
    #[error("{0} not configured")]
    MissingCredential(&'static str),

    /// An AI provider or storage service returned a failure. The detail is
    /// logged server-side; only a generic message reaches the end user.
    #[error("upstream error from {service} (HTTP {status}): {detail}")]
    Upstream {
        service: &'static str,
        status: u16,
        detail: String,
    },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl GateError {
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    pub fn upstream(service: &'static str, status: u16, detail: impl Into<String>) -> Self {
        Self::Upstream {
            service,
            status,
            detail: detail.into(),
        }
    }
}
