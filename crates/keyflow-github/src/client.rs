//! GitHub REST API client for the authenticated user's GPG keys
//!
//! Uses Bearer token authentication. Every non-2xx response, including
//! `304 Not Modified`, is returned as [`GitHubError::Api`] so callers can
//! classify it.

use crate::config::GitHubConfig;
use crate::error::{GitHubError, Result};
use reqwest::header::{ACCEPT, ETAG, IF_NONE_MATCH};
use serde::{Deserialize, Serialize};
use tracing::debug;

const ACCEPT_GITHUB_JSON: &str = "application/vnd.github+json";
const API_VERSION_HEADER: &str = "X-GitHub-Api-Version";
const API_VERSION: &str = "2022-11-28";

/// GitHub GPG key API client
#[derive(Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    token: String,
    base_url: String,
}

/// The fields keyflow reads from a GitHub GPG key
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GpgKey {
    pub id: i64,
    /// Fingerprint-derived key ID (e.g., "3262EFF25BA0D270")
    pub key_id: String,
}

/// A fetched GPG key together with the validator GitHub issued for it
#[derive(Debug, Clone)]
pub struct TaggedGpgKey {
    pub key: GpgKey,
    pub etag: Option<String>,
}

impl GitHubClient {
    /// Create a new client
    pub fn new(config: GitHubConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            token: config.token,
            base_url: config.base_url,
        })
    }

    fn key_url(&self, id: i64) -> String {
        format!("{}/user/gpg_keys/{}", self.base_url, id)
    }

    /// Upload an ASCII-armored public key
    pub async fn create_gpg_key(&self, armored_public_key: &str) -> Result<GpgKey> {
        let url = format!("{}/user/gpg_keys", self.base_url);
        debug!(url = %url, "POST request");

        let request_body = CreateGpgKeyRequest {
            armored_public_key: armored_public_key.to_string(),
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .header(ACCEPT, ACCEPT_GITHUB_JSON)
            .header(API_VERSION_HEADER, API_VERSION)
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        Ok(response.json().await?)
    }

    /// Fetch a GPG key, conditionally on `etag` when one is supplied
    pub async fn get_gpg_key(&self, id: i64, etag: Option<&str>) -> Result<TaggedGpgKey> {
        let url = self.key_url(id);
        debug!(url = %url, conditional = etag.is_some(), "GET request");

        let mut request = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .header(ACCEPT, ACCEPT_GITHUB_JSON)
            .header(API_VERSION_HEADER, API_VERSION);
        if let Some(etag) = etag {
            request = request.header(IF_NONE_MATCH, etag);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let etag = response
            .headers()
            .get(ETAG)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let key = response.json().await?;

        Ok(TaggedGpgKey { key, etag })
    }

    /// Delete a GPG key
    pub async fn delete_gpg_key(&self, id: i64) -> Result<()> {
        let url = self.key_url(id);
        debug!(url = %url, "DELETE request");

        let response = self
            .http
            .delete(&url)
            .bearer_auth(&self.token)
            .header(ACCEPT, ACCEPT_GITHUB_JSON)
            .header(API_VERSION_HEADER, API_VERSION)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        Ok(())
    }
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

async fn api_error(response: reqwest::Response) -> GitHubError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&body)
        .map(|b| b.message)
        .unwrap_or(body);

    debug!(status, message = %message, "GitHub API error response");
    GitHubError::Api { status, message }
}

// ============ API Types ============

#[derive(Debug, Serialize)]
struct CreateGpgKeyRequest {
    armored_public_key: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}
