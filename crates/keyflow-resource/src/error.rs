//! Resource framework error types

use crate::state::ResourceState;
use thiserror::Error;

/// Errors surfaced by resource implementations and the orchestrator
#[derive(Error, Debug)]
pub enum ResourceError {
    #[error("Resource type not registered: {0}")]
    ResourceTypeNotFound(String),

    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    #[error("Invalid resource identifier {id:?}: {reason}")]
    InvalidIdentifier { id: String, reason: String },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Remote call failed: {0}")]
    Remote(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The remote object exists but could not be read back after creation.
    /// `state` carries the identifier so the object stays tracked.
    #[error("{} was created as {} but could not be read back: {source}", .state.resource_type, .state.id)]
    PartiallyCreated {
        state: Box<ResourceState>,
        #[source]
        source: Box<ResourceError>,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("State file error: {0}")]
    StateError(String),

    #[error("Lock acquisition failed: {0}")]
    LockError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ResourceError>;
