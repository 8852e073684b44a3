//! Resource trait definition

use crate::error::Result;
use crate::state::ResourceState;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Resource type abstraction trait
///
/// Every managed resource type implements the three lifecycle verbs.
/// Implementations receive their remote client at construction time and
/// never build their own transport.
#[async_trait]
pub trait Resource: Send + Sync {
    /// Returns the resource type name (e.g., "github_user_gpg_key")
    fn resource_type(&self) -> &str;

    /// Declared fields of this resource type
    fn schema(&self) -> &[FieldSchema];

    /// Create the remote object and return its fully synced state
    async fn create(&self, config: &ResourceConfig) -> Result<ResourceState>;

    /// Refresh tracked state from the remote.
    ///
    /// `Ok(None)` means the remote object no longer exists and the resource
    /// should be dropped from tracked state. It is not an error.
    async fn read(&self, state: &ResourceState) -> Result<Option<ResourceState>>;

    /// Delete the remote object
    async fn delete(&self, state: &ResourceState) -> Result<()>;
}

/// How a declared field is populated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Supplied by the user in the manifest
    Required,
    /// Populated by the remote service
    Computed,
}

/// Declaration of a single resource field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSchema {
    pub name: &'static str,
    pub kind: FieldKind,
    /// Changing this field requires destroying and recreating the resource
    pub force_new: bool,
    /// Internal bookkeeping, hidden from `show` output
    pub internal: bool,
    pub description: &'static str,
}

impl FieldSchema {
    pub const fn required(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Required,
            force_new: false,
            internal: false,
            description,
        }
    }

    pub const fn computed(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Computed,
            force_new: false,
            internal: false,
            description,
        }
    }

    pub const fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    pub const fn internal(mut self) -> Self {
        self.internal = true;
        self
    }
}

/// Set of resources to be managed
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceSet {
    /// Resources indexed by `type:name`
    pub resources: BTreeMap<String, ResourceConfig>,
}

impl ResourceSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, resource: ResourceConfig) {
        self.resources.insert(resource.key(), resource);
    }

    pub fn get(&self, key: &str) -> Option<&ResourceConfig> {
        self.resources.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResourceConfig> {
        self.resources.values()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

/// Desired configuration for a single resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// Resource type (e.g., "github_user_gpg_key")
    pub resource_type: String,

    /// Resource name inside the manifest
    pub name: String,

    /// Resource-specific configuration
    pub config: serde_json::Value,
}

impl ResourceConfig {
    pub fn new(
        resource_type: impl Into<String>,
        name: impl Into<String>,
        config: serde_json::Value,
    ) -> Self {
        Self {
            resource_type: resource_type.into(),
            name: name.into(),
            config,
        }
    }

    /// Get the full resource key (type:name)
    pub fn key(&self) -> String {
        resource_key(&self.resource_type, &self.name)
    }

    /// Get a configuration value as a specific type
    pub fn get_config<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.config
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }
}

/// Build the `type:name` key used by both desired and tracked state
pub fn resource_key(resource_type: &str, name: &str) -> String {
    format!("{}:{}", resource_type, name)
}

/// Split a `type:name` key back into its parts
pub fn split_key(key: &str) -> Option<(&str, &str)> {
    key.split_once(':')
}
