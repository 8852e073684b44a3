//! `github_user_gpg_key` resource type

use crate::error::GitHubError;
use crate::reconciler::{GpgKeyConfig, GpgKeyReconciler, GpgKeyState};
use crate::service::KeyService;
use async_trait::async_trait;
use keyflow_resource::{
    ResourceError, FieldSchema, Resource, ResourceConfig, ResourceRegistry, ResourceState,
};
use serde_json::json;
use std::sync::Arc;

pub const RESOURCE_TYPE: &str = "github_user_gpg_key";

const ARMORED_PUBLIC_KEY: &str = "armored_public_key";
const KEY_ID: &str = "key_id";
const ETAG: &str = "etag";

static SCHEMA: [FieldSchema; 3] = [
    FieldSchema::required(
        ARMORED_PUBLIC_KEY,
        "Your public GPG key, generated in ASCII-armored format.",
    )
    .force_new(),
    FieldSchema::computed(KEY_ID, "The key ID of the GPG key."),
    FieldSchema::computed(ETAG, "Validator used for conditional reads.").internal(),
];

/// GitHub user GPG key resource
pub struct GpgKeyResource {
    reconciler: GpgKeyReconciler,
}

impl GpgKeyResource {
    pub fn new(service: Arc<dyn KeyService>) -> Self {
        Self {
            reconciler: GpgKeyReconciler::new(service),
        }
    }
}

/// Register the GPG key resource type backed by `service`
pub fn register(registry: &mut ResourceRegistry, service: Arc<dyn KeyService>) {
    registry.register(Arc::new(GpgKeyResource::new(service)));
}

fn desired_from_config(config: &ResourceConfig) -> keyflow_resource::Result<GpgKeyConfig> {
    let armored_public_key: String = config
        .get_config(ARMORED_PUBLIC_KEY)
        .filter(|key: &String| !key.trim().is_empty())
        .ok_or_else(|| {
            ResourceError::InvalidConfig(format!(
                "{} requires a non-empty {}",
                config.key(),
                ARMORED_PUBLIC_KEY
            ))
        })?;

    Ok(GpgKeyConfig { armored_public_key })
}

fn gpg_state_from(state: &ResourceState) -> keyflow_resource::Result<GpgKeyState> {
    let armored_public_key = state.get_attribute(ARMORED_PUBLIC_KEY).ok_or_else(|| {
        ResourceError::StateError(format!(
            "tracked GPG key {} has no {}",
            state.id, ARMORED_PUBLIC_KEY
        ))
    })?;

    Ok(GpgKeyState {
        id: state.id.clone(),
        armored_public_key,
        key_id: state.get_attribute(KEY_ID),
        etag: state.get_attribute(ETAG),
    })
}

fn resource_state_from(key: GpgKeyState) -> ResourceState {
    let mut state = ResourceState::new(key.id, RESOURCE_TYPE)
        .with_attribute(ARMORED_PUBLIC_KEY, json!(key.armored_public_key));
    if let Some(key_id) = key.key_id {
        state = state.with_attribute(KEY_ID, json!(key_id));
    }
    if let Some(etag) = key.etag {
        state = state.with_attribute(ETAG, json!(etag));
    }
    state
}

#[async_trait]
impl Resource for GpgKeyResource {
    fn resource_type(&self) -> &str {
        RESOURCE_TYPE
    }

    fn schema(&self) -> &[FieldSchema] {
        &SCHEMA
    }

    async fn create(&self, config: &ResourceConfig) -> keyflow_resource::Result<ResourceState> {
        let desired = desired_from_config(config)?;
        match self.reconciler.create(&desired).await {
            Ok(created) => Ok(resource_state_from(created)),
            Err(GitHubError::ReadAfterCreate { state, source }) => {
                Err(ResourceError::PartiallyCreated {
                    state: Box::new(resource_state_from(*state)),
                    source: Box::new(ResourceError::from(*source)),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn read(&self, state: &ResourceState) -> keyflow_resource::Result<Option<ResourceState>> {
        let stored = gpg_state_from(state)?;

        let Some(refreshed) = self.reconciler.read(&stored, false).await? else {
            return Ok(None);
        };
        if refreshed == stored {
            return Ok(Some(state.clone()));
        }

        let mut next = resource_state_from(refreshed);
        next.created_at = state.created_at;
        Ok(Some(next))
    }

    async fn delete(&self, state: &ResourceState) -> keyflow_resource::Result<()> {
        let stored = gpg_state_from(state)?;
        self.reconciler.delete(&stored).await?;
        Ok(())
    }
}
