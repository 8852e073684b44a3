//! Classification of failed GitHub calls
//!
//! A conditional read answers "not modified" and "not found" through HTTP
//! error statuses. Those two are ordinary outcomes for the reconciler;
//! everything else is a hard failure surfaced to the caller unchanged.

use crate::error::GitHubError;

/// What a failed remote call means to the reconciler
#[derive(Debug)]
pub enum Classification {
    /// The supplied validator is still current (HTTP 304)
    NotModified,
    /// The record does not exist (HTTP 404)
    NotFound,
    /// Authorization, rate limiting, server or transport failure
    Hard(GitHubError),
}

pub fn classify(err: GitHubError) -> Classification {
    match err.status() {
        Some(304) => Classification::NotModified,
        Some(404) => Classification::NotFound,
        _ => Classification::Hard(err),
    }
}
