//! GitHub resource error types

use crate::reconciler::GpgKeyState;
use keyflow_resource::ResourceError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GitHubError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid GPG key identifier {id:?}: {source}")]
    InvalidIdentifier {
        id: String,
        source: std::num::ParseIntError,
    },

    #[error("GitHub API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("GPG key {0} disappeared right after it was created")]
    VanishedAfterCreate(String),

    /// Upload succeeded but the follow-up read failed. `state` holds the
    /// assigned id so the key is not orphaned.
    #[error("GPG key {} was created but reading it back failed: {source}", .state.id)]
    ReadAfterCreate {
        state: Box<GpgKeyState>,
        source: Box<GitHubError>,
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GitHubError {
    /// HTTP status of a failed API response
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<GitHubError> for ResourceError {
    fn from(err: GitHubError) -> Self {
        match err {
            GitHubError::InvalidIdentifier { id, source } => ResourceError::InvalidIdentifier {
                id,
                reason: source.to_string(),
            },
            GitHubError::MissingEnvVar(_) | GitHubError::InvalidConfig(_) => {
                ResourceError::InvalidConfig(err.to_string())
            }
            GitHubError::Api { status: 401, .. } => {
                ResourceError::AuthenticationFailed(err.to_string())
            }
            GitHubError::Api { status: 404, .. } => ResourceError::ResourceNotFound(err.to_string()),
            GitHubError::Json(e) => ResourceError::Json(e),
            other => ResourceError::Remote(Box::new(other)),
        }
    }
}

pub type Result<T> = std::result::Result<T, GitHubError>;
