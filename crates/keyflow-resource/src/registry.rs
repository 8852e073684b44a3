//! Resource type registry
//!
//! Resource types are registered explicitly at process start and the
//! populated registry is handed to the orchestrator.

use crate::error::{ResourceError, Result};
use crate::resource::{FieldKind, FieldSchema, Resource, ResourceSet};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Default, Clone)]
pub struct ResourceRegistry {
    types: BTreeMap<String, Arc<dyn Resource>>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource type, replacing any previous registration
    pub fn register(&mut self, resource: Arc<dyn Resource>) {
        let name = resource.resource_type().to_string();
        if self.types.insert(name.clone(), resource).is_some() {
            tracing::warn!("Resource type {} registered twice, keeping the latest", name);
        } else {
            tracing::debug!("Registered resource type {}", name);
        }
    }

    /// Look up a resource type
    pub fn get(&self, resource_type: &str) -> Result<&Arc<dyn Resource>> {
        self.types
            .get(resource_type)
            .ok_or_else(|| ResourceError::ResourceTypeNotFound(resource_type.to_string()))
    }

    /// Declared fields of a registered resource type
    pub fn schema(&self, resource_type: &str) -> Result<&[FieldSchema]> {
        Ok(self.get(resource_type)?.schema())
    }

    pub fn contains(&self, resource_type: &str) -> bool {
        self.types.contains_key(resource_type)
    }

    /// Check that every desired resource has a registered type and sets
    /// each of its required fields
    pub fn validate(&self, desired: &ResourceSet) -> Result<()> {
        for config in desired.iter() {
            let resource = self.get(&config.resource_type)?;

            for field in resource.schema() {
                let value = config.config.get(field.name);
                match field.kind {
                    FieldKind::Required => {
                        let present = match value {
                            None | Some(serde_json::Value::Null) => false,
                            Some(serde_json::Value::String(s)) => !s.trim().is_empty(),
                            Some(_) => true,
                        };
                        if !present {
                            return Err(ResourceError::InvalidConfig(format!(
                                "{}: {} is required",
                                config.key(),
                                field.name
                            )));
                        }
                    }
                    FieldKind::Computed if value.is_some() => {
                        return Err(ResourceError::InvalidConfig(format!(
                            "{}: {} is computed and cannot be set",
                            config.key(),
                            field.name
                        )));
                    }
                    FieldKind::Computed => {}
                }
            }

            if let Some(fields) = config.config.as_object() {
                for name in fields.keys() {
                    if !resource.schema().iter().any(|f| f.name == name) {
                        return Err(ResourceError::InvalidConfig(format!(
                            "{}: unknown field {}",
                            config.key(),
                            name
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Registered type names, sorted
    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for ResourceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceRegistry")
            .field("types", &self.types.keys().collect::<Vec<_>>())
            .finish()
    }
}
