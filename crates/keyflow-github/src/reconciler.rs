//! Create / Read / Delete for a user GPG key
//!
//! A key moves `Absent -> Created -> Synced -> Absent`. Create always ends
//! with an unconditional read so the returned state is synced. Read sends
//! the stored ETag as a precondition, except right after creation.

use crate::error::{GitHubError, Result};
use crate::id;
use crate::service::{KeyOutcome, KeyService};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Desired configuration of a GPG key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GpgKeyConfig {
    pub armored_public_key: String,
}

/// Tracked state of a GPG key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GpgKeyState {
    /// Encoded GitHub key id, set once at creation
    pub id: String,
    /// Key material as supplied at creation; never modified afterwards
    pub armored_public_key: String,
    /// Key ID reported by GitHub
    pub key_id: Option<String>,
    /// Validator from the last non-cached read of `id`
    pub etag: Option<String>,
}

pub struct GpgKeyReconciler {
    service: Arc<dyn KeyService>,
}

impl GpgKeyReconciler {
    pub fn new(service: Arc<dyn KeyService>) -> Self {
        Self { service }
    }

    /// Upload the key and return its synced state.
    ///
    /// Nothing is returned when the upload fails. Once GitHub has assigned
    /// an id, a failed read-back still hands the id out through
    /// [`GitHubError::ReadAfterCreate`].
    pub async fn create(&self, desired: &GpgKeyConfig) -> Result<GpgKeyState> {
        let created = self
            .service
            .create_key(&desired.armored_public_key)
            .await?;

        let state = GpgKeyState {
            id: id::encode(created.id),
            armored_public_key: desired.armored_public_key.clone(),
            key_id: Some(created.key_id),
            etag: None,
        };
        tracing::info!("Created user GPG key {}", state.id);

        match self.read(&state, true).await {
            Ok(Some(synced)) => Ok(synced),
            Ok(None) => Err(GitHubError::VanishedAfterCreate(state.id)),
            Err(source) => {
                tracing::warn!(
                    "Reading user GPG key {} after create failed: {}",
                    state.id,
                    source
                );
                Err(GitHubError::ReadAfterCreate {
                    state: Box::new(state),
                    source: Box::new(source),
                })
            }
        }
    }

    /// Refresh `stored` from GitHub.
    ///
    /// Returns `Ok(None)` when the key no longer exists remotely. A freshly
    /// created key is always fetched unconditionally.
    pub async fn read(&self, stored: &GpgKeyState, fresh: bool) -> Result<Option<GpgKeyState>> {
        let id = id::decode(&stored.id)?;
        let validator = if fresh { None } else { stored.etag.as_deref() };

        match self.service.get_key(id, validator).await? {
            KeyOutcome::Unchanged => {
                tracing::debug!("User GPG key {} not modified", stored.id);
                Ok(Some(stored.clone()))
            }
            KeyOutcome::Updated { key_id, etag } => Ok(Some(GpgKeyState {
                key_id: Some(key_id),
                etag,
                ..stored.clone()
            })),
            KeyOutcome::Absent => {
                tracing::info!(
                    "Removing user GPG key {} from state because it no longer exists in GitHub",
                    stored.id
                );
                Ok(None)
            }
        }
    }

    /// Delete the key from GitHub. No existence check is made first.
    pub async fn delete(&self, stored: &GpgKeyState) -> Result<()> {
        let id = id::decode(&stored.id)?;
        self.service.delete_key(id).await?;
        tracing::info!("Deleted user GPG key {}", stored.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::CreatedKey;
    use crate::testing::{ScriptedKeyService, api_error};

    const ARMORED: &str = "-----BEGIN PGP PUBLIC KEY BLOCK-----\n\nmQENBF...\n-----END PGP PUBLIC KEY BLOCK-----";

    fn reconciler(service: &Arc<ScriptedKeyService>) -> GpgKeyReconciler {
        GpgKeyReconciler::new(service.clone())
    }

    fn stored(id: &str, etag: Option<&str>) -> GpgKeyState {
        GpgKeyState {
            id: id.to_string(),
            armored_public_key: ARMORED.to_string(),
            key_id: Some("AAAA1111".to_string()),
            etag: etag.map(str::to_string),
        }
    }

    fn desired() -> GpgKeyConfig {
        GpgKeyConfig {
            armored_public_key: ARMORED.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_then_read_syncs_state() {
        let service = Arc::new(
            ScriptedKeyService::new()
                .on_create(Ok(CreatedKey {
                    id: 123,
                    key_id: "AAAA1111".to_string(),
                }))
                .on_get(Ok(KeyOutcome::Updated {
                    key_id: "AAAA1111".to_string(),
                    etag: Some("W/\"abc\"".to_string()),
                })),
        );

        let state = reconciler(&service).create(&desired()).await.unwrap();

        assert_eq!(id::decode(&state.id).unwrap(), 123);
        assert_eq!(state.key_id.as_deref(), Some("AAAA1111"));
        assert_eq!(state.etag.as_deref(), Some("W/\"abc\""));
        assert_eq!(state.armored_public_key, ARMORED);
        assert_eq!(*service.created_keys.lock().unwrap(), vec![ARMORED.to_string()]);
    }

    #[tokio::test]
    async fn test_create_reads_without_validator() {
        let service = Arc::new(
            ScriptedKeyService::new()
                .on_create(Ok(CreatedKey {
                    id: 7,
                    key_id: "BBBB2222".to_string(),
                }))
                .on_get(Ok(KeyOutcome::Updated {
                    key_id: "BBBB2222".to_string(),
                    etag: Some("v1".to_string()),
                })),
        );

        reconciler(&service).create(&desired()).await.unwrap();

        assert_eq!(*service.reads.lock().unwrap(), vec![(7, None)]);
    }

    #[tokio::test]
    async fn test_create_failure_records_nothing() {
        let service = Arc::new(
            ScriptedKeyService::new().on_create(Err(api_error(422, "key is already in use"))),
        );

        let result = reconciler(&service).create(&desired()).await;

        match result {
            Err(GitHubError::Api { status, message }) => {
                assert_eq!(status, 422);
                assert_eq!(message, "key is already in use");
            }
            other => panic!("expected API error, got {:?}", other),
        }
        assert!(service.reads.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_then_absent_fails() {
        let service = Arc::new(
            ScriptedKeyService::new()
                .on_create(Ok(CreatedKey {
                    id: 5,
                    key_id: "CCCC".to_string(),
                }))
                .on_get(Ok(KeyOutcome::Absent)),
        );

        let result = reconciler(&service).create(&desired()).await;
        assert!(matches!(result, Err(GitHubError::VanishedAfterCreate(id)) if id == "5"));
    }

    #[tokio::test]
    async fn test_create_keeps_id_when_read_back_fails() {
        let service = Arc::new(
            ScriptedKeyService::new()
                .on_create(Ok(CreatedKey {
                    id: 123,
                    key_id: "AAAA1111".to_string(),
                }))
                .on_get(Err(api_error(502, "bad gateway"))),
        );

        let result = reconciler(&service).create(&desired()).await;

        match result {
            Err(GitHubError::ReadAfterCreate { state, source }) => {
                assert_eq!(state.id, "123");
                assert_eq!(state.key_id.as_deref(), Some("AAAA1111"));
                assert_eq!(state.armored_public_key, ARMORED);
                assert_eq!(state.etag, None);
                assert_eq!(source.status(), Some(502));
            }
            other => panic!("expected ReadAfterCreate, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fresh_read_ignores_stale_validator() {
        let service = Arc::new(ScriptedKeyService::new().on_get(Ok(KeyOutcome::Updated {
            key_id: "AAAA1111".to_string(),
            etag: Some("new".to_string()),
        })));

        let state = reconciler(&service)
            .read(&stored("123", Some("stale")), true)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(*service.reads.lock().unwrap(), vec![(123, None)]);
        assert_eq!(state.etag.as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn test_read_sends_stored_validator() {
        let service = Arc::new(ScriptedKeyService::new().on_get(Ok(KeyOutcome::Unchanged)));

        reconciler(&service)
            .read(&stored("123", Some("W/\"abc\"")), false)
            .await
            .unwrap();

        assert_eq!(
            *service.reads.lock().unwrap(),
            vec![(123, Some("W/\"abc\"".to_string()))]
        );
    }

    #[tokio::test]
    async fn test_unchanged_read_returns_input() {
        let service = Arc::new(ScriptedKeyService::new().on_get(Ok(KeyOutcome::Unchanged)));
        let input = stored("123", Some("W/\"abc\""));

        let refreshed = reconciler(&service).read(&input, false).await.unwrap();

        assert_eq!(refreshed, Some(input));
    }

    #[tokio::test]
    async fn test_updated_read_refreshes_computed_fields() {
        let service = Arc::new(ScriptedKeyService::new().on_get(Ok(KeyOutcome::Updated {
            key_id: "DDDD4444".to_string(),
            etag: Some("v2".to_string()),
        })));
        let input = stored("123", Some("v1"));

        let refreshed = reconciler(&service)
            .read(&input, false)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(refreshed.id, input.id);
        assert_eq!(refreshed.armored_public_key, input.armored_public_key);
        assert_eq!(refreshed.key_id.as_deref(), Some("DDDD4444"));
        assert_eq!(refreshed.etag.as_deref(), Some("v2"));
    }

    #[tokio::test]
    async fn test_absent_read_clears_state() {
        let service = Arc::new(ScriptedKeyService::new().on_get(Ok(KeyOutcome::Absent)));

        let refreshed = reconciler(&service)
            .read(&stored("999", Some("v1")), false)
            .await
            .unwrap();

        assert_eq!(refreshed, None);
    }

    #[tokio::test]
    async fn test_read_propagates_hard_failure() {
        let service = Arc::new(
            ScriptedKeyService::new().on_get(Err(api_error(403, "rate limit exceeded"))),
        );

        let result = reconciler(&service).read(&stored("123", None), false).await;
        assert!(matches!(result, Err(GitHubError::Api { status: 403, .. })));
    }

    #[tokio::test]
    async fn test_invalid_identifier_never_calls_remote() {
        let service = Arc::new(ScriptedKeyService::new());
        let reconciler = reconciler(&service);
        let bad = stored("not-a-number", Some("v1"));

        assert!(matches!(
            reconciler.read(&bad, false).await,
            Err(GitHubError::InvalidIdentifier { .. })
        ));
        assert!(matches!(
            reconciler.delete(&bad).await,
            Err(GitHubError::InvalidIdentifier { .. })
        ));
        assert_eq!(service.call_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_calls_remote() {
        let service = Arc::new(ScriptedKeyService::new());

        reconciler(&service).delete(&stored("123", None)).await.unwrap();

        assert_eq!(*service.deleted.lock().unwrap(), vec![123]);
    }

    #[tokio::test]
    async fn test_delete_propagates_failure_verbatim() {
        let service = Arc::new(ScriptedKeyService::new().on_delete(Err(api_error(404, "Not Found"))));

        let result = reconciler(&service).delete(&stored("123", None)).await;
        assert!(matches!(
            result,
            Err(GitHubError::Api { status: 404, message }) if message == "Not Found"
        ));
    }

    #[tokio::test]
    async fn test_full_lifecycle_scenario() {
        let service = Arc::new(
            ScriptedKeyService::new()
                .on_create(Ok(CreatedKey {
                    id: 123,
                    key_id: "AAAA1111".to_string(),
                }))
                .on_get(Ok(KeyOutcome::Updated {
                    key_id: "AAAA1111".to_string(),
                    etag: Some("W/abc".to_string()),
                }))
                .on_get(Ok(KeyOutcome::Unchanged)),
        );
        let reconciler = reconciler(&service);

        let created = reconciler.create(&desired()).await.unwrap();
        let refreshed = reconciler.read(&created, false).await.unwrap().unwrap();

        assert_eq!(refreshed.key_id.as_deref(), Some("AAAA1111"));
        assert_eq!(refreshed.etag.as_deref(), Some("W/abc"));
        assert_eq!(
            *service.reads.lock().unwrap(),
            vec![(123, None), (123, Some("W/abc".to_string()))]
        );

        reconciler.delete(&refreshed).await.unwrap();
        assert_eq!(*service.deleted.lock().unwrap(), vec![123]);
    }
}
