//! Remote key service capability
//!
//! The reconciler only talks to [`KeyService`]. [`GitHubClient`] is the
//! production implementation; tests substitute an in-memory one.

use crate::classify::{Classification, classify};
use crate::client::GitHubClient;
use crate::error::Result;
use async_trait::async_trait;

/// Key created on the remote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedKey {
    pub id: i64,
    pub key_id: String,
}

/// Outcome of a conditional read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Nothing changed relative to the supplied validator
    Unchanged,
    /// Fresh data and the validator issued with it
    Updated { key_id: String, etag: Option<String> },
    /// The remote has no such record
    Absent,
}

#[async_trait]
pub trait KeyService: Send + Sync {
    async fn create_key(&self, armored_public_key: &str) -> Result<CreatedKey>;

    /// Read a key. `validator` is sent as a precondition when present.
    async fn get_key(&self, id: i64, validator: Option<&str>) -> Result<KeyOutcome>;

    /// Delete a key.
    ///
    /// Deleting a key that no longer exists is reported as an error
    /// (HTTP 404), not as success.
    async fn delete_key(&self, id: i64) -> Result<()>;
}

#[async_trait]
impl KeyService for GitHubClient {
    async fn create_key(&self, armored_public_key: &str) -> Result<CreatedKey> {
        let key = self.create_gpg_key(armored_public_key).await?;
        Ok(CreatedKey {
            id: key.id,
            key_id: key.key_id,
        })
    }

    async fn get_key(&self, id: i64, validator: Option<&str>) -> Result<KeyOutcome> {
        match self.get_gpg_key(id, validator).await {
            Ok(tagged) => Ok(KeyOutcome::Updated {
                key_id: tagged.key.key_id,
                etag: tagged.etag,
            }),
            Err(err) => match classify(err) {
                Classification::NotModified => Ok(KeyOutcome::Unchanged),
                Classification::NotFound => Ok(KeyOutcome::Absent),
                Classification::Hard(err) => Err(err),
            },
        }
    }

    async fn delete_key(&self, id: i64) -> Result<()> {
        self.delete_gpg_key(id).await
    }
}
