//! GitHub user GPG key resource for keyflow
//!
//! This crate implements the `github_user_gpg_key` resource type: an
//! ASCII-armored public key uploaded to the authenticated user's GitHub
//! account.
//!
//! # Features
//!
//! - Create / Read / Delete against `/user/gpg_keys`
//! - Conditional reads with `If-None-Match`, so unchanged keys cost a 304
//! - Keys deleted outside keyflow are dropped from state on refresh
//! - Changing the key material forces a replacement (there is no update)
//!
//! # Requirements
//!
//! - `GITHUB_TOKEN` with the `write:gpg_key` scope (`admin:gpg_key` to delete)
//! - Optional `GITHUB_BASE_URL` for GitHub Enterprise
//!
//! # Example
//!
//! ```ignore
//! use keyflow_github::{GitHubClient, GitHubConfig};
//! use keyflow_resource::ResourceRegistry;
//! use std::sync::Arc;
//!
//! let client = GitHubClient::new(GitHubConfig::from_env()?)?;
//!
//! let mut registry = ResourceRegistry::new();
//! keyflow_github::register(&mut registry, Arc::new(client));
//! ```

pub mod classify;
pub mod client;
pub mod config;
pub mod error;
pub mod id;
pub mod reconciler;
pub mod resource;
pub mod service;

#[cfg(test)]
mod testing;

pub use classify::{Classification, classify};
pub use client::{GitHubClient, GpgKey, TaggedGpgKey};
pub use config::GitHubConfig;
pub use error::{GitHubError, Result};
pub use reconciler::{GpgKeyConfig, GpgKeyReconciler, GpgKeyState};
pub use resource::{GpgKeyResource, RESOURCE_TYPE, register};
pub use service::{CreatedKey, KeyOutcome, KeyService};
