//! Planning and serial execution of resource lifecycle verbs
//!
//! The orchestrator never retries. A failed verb is recorded in the
//! [`ApplyResult`] and processing moves on to the next resource, leaving
//! the failed resource's tracked state untouched.

use crate::action::{Action, ActionType, ApplyResult, Plan};
use crate::error::{ResourceError, Result};
use crate::registry::ResourceRegistry;
use crate::resource::{FieldKind, FieldSchema, ResourceConfig, ResourceSet};
use crate::state::{GlobalState, ResourceState};
use std::time::Instant;

/// Calculate the actions needed to move `state` to `desired`
pub fn plan(
    desired: &ResourceSet,
    state: &GlobalState,
    registry: &ResourceRegistry,
) -> Result<Plan> {
    let mut actions = Vec::new();

    for config in desired.iter() {
        let resource = registry.get(&config.resource_type)?;
        let key = config.key();

        match state.get_resource(&key) {
            None => actions.push(Action::new(ActionType::Create, key)),
            Some(current) => {
                let changed = changed_force_new_fields(resource.schema(), config, current);
                if changed.is_empty() {
                    actions.push(Action::new(ActionType::NoOp, key));
                } else {
                    actions.push(
                        Action::new(ActionType::Replace, key).with_changed_fields(changed),
                    );
                }
            }
        }
    }

    for key in state.resources.keys() {
        if desired.get(key).is_none() {
            actions.push(Action::new(ActionType::Delete, key.clone()));
        }
    }

    Ok(Plan::new(actions))
}

/// Plan that deletes every tracked resource
pub fn destroy_plan(state: &GlobalState) -> Plan {
    Plan::new(
        state
            .resources
            .keys()
            .map(|key| Action::new(ActionType::Delete, key.clone()))
            .collect(),
    )
}

fn changed_force_new_fields(
    schema: &[FieldSchema],
    config: &ResourceConfig,
    current: &ResourceState,
) -> Vec<String> {
    schema
        .iter()
        .filter(|field| field.kind == FieldKind::Required && field.force_new)
        .filter(|field| config.config.get(field.name) != current.attributes.get(field.name))
        .map(|field| field.name.to_string())
        .collect()
}

/// Drives resource verbs against tracked state
pub struct Orchestrator<'a> {
    registry: &'a ResourceRegistry,
}

impl<'a> Orchestrator<'a> {
    pub fn new(registry: &'a ResourceRegistry) -> Self {
        Self { registry }
    }

    /// Refresh every tracked resource from its remote.
    ///
    /// Resources the remote reports as gone are dropped from `state`.
    pub async fn refresh(&self, state: &mut GlobalState) -> ApplyResult {
        let mut result = ApplyResult::new();
        let start = Instant::now();

        for key in state.keys() {
            let action_id = format!("refresh-{}", key);
            match self.refresh_one(&key, state).await {
                Ok(message) => result.add_success(action_id, message),
                Err(e) => {
                    tracing::error!("Failed to refresh {}: {}", key, e);
                    result.add_failure(action_id, e.to_string());
                }
            }
        }

        result.duration_ms = start.elapsed().as_millis() as u64;
        result
    }

    async fn refresh_one(&self, key: &str, state: &mut GlobalState) -> Result<String> {
        let current = state
            .get_resource(key)
            .ok_or_else(|| ResourceError::ResourceNotFound(key.to_string()))?;
        let resource = self.registry.get(&current.resource_type)?;

        match resource.read(current).await? {
            Some(refreshed) if &refreshed == current => Ok(format!("{} is unchanged", key)),
            Some(refreshed) => {
                state.set_resource(key.to_string(), refreshed);
                Ok(format!("{} refreshed", key))
            }
            None => {
                tracing::info!(
                    "Removing {} from state because it no longer exists remotely",
                    key
                );
                state.remove_resource(key);
                Ok(format!("{} no longer exists and was removed from state", key))
            }
        }
    }

    /// Apply the planned actions serially
    pub async fn apply(
        &self,
        plan: &Plan,
        desired: &ResourceSet,
        state: &mut GlobalState,
    ) -> ApplyResult {
        let mut result = ApplyResult::new();
        let start = Instant::now();

        for action in &plan.actions {
            let outcome = match action.action_type {
                ActionType::Create => self.create_one(&action.resource_key, desired, state).await,
                ActionType::Delete => self.delete_one(&action.resource_key, state).await,
                ActionType::Replace => {
                    match self.delete_one(&action.resource_key, state).await {
                        Ok(_) => self.create_one(&action.resource_key, desired, state).await,
                        Err(e) => Err(e),
                    }
                }
                ActionType::NoOp => continue,
            };

            match outcome {
                Ok(message) => result.add_success(action.id.clone(), message),
                Err(e) => {
                    tracing::error!("{} failed: {}", action.id, e);
                    result.add_failure(action.id.clone(), e.to_string());
                }
            }
        }

        result.duration_ms = start.elapsed().as_millis() as u64;
        result
    }

    /// Delete every tracked resource
    pub async fn destroy(&self, state: &mut GlobalState) -> ApplyResult {
        let plan = destroy_plan(state);
        self.apply(&plan, &ResourceSet::new(), state).await
    }

    async fn create_one(
        &self,
        key: &str,
        desired: &ResourceSet,
        state: &mut GlobalState,
    ) -> Result<String> {
        let config = desired
            .get(key)
            .ok_or_else(|| ResourceError::ResourceNotFound(key.to_string()))?;
        let resource = self.registry.get(&config.resource_type)?;

        tracing::info!("Creating {}", key);
        let created = match resource.create(config).await {
            Ok(created) => created,
            Err(ResourceError::PartiallyCreated {
                state: partial,
                source,
            }) => {
                tracing::warn!(
                    "{} was created as {} but not synced, tracking it anyway",
                    key,
                    partial.id
                );
                state.set_resource(key.to_string(), (*partial).clone());
                return Err(ResourceError::PartiallyCreated {
                    state: partial,
                    source,
                });
            }
            Err(e) => return Err(e),
        };
        let message = format!("{} created with id {}", key, created.id);
        state.set_resource(key.to_string(), created);
        Ok(message)
    }

    async fn delete_one(&self, key: &str, state: &mut GlobalState) -> Result<String> {
        let current = state
            .get_resource(key)
            .ok_or_else(|| ResourceError::ResourceNotFound(key.to_string()))?;
        let resource = self.registry.get(&current.resource_type)?;

        tracing::info!("Deleting {} (id {})", key, current.id);
        resource.delete(current).await?;
        let message = format!("{} destroyed", key);
        state.remove_resource(key);
        Ok(message)
    }
}
