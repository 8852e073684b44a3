//! keyflow resource framework
//!
//! This crate provides the declarative side of keyflow: the [`Resource`]
//! trait each managed resource type implements, the explicit
//! [`ResourceRegistry`] those types are registered in, persisted state
//! tracking and the orchestrator that plans and applies changes.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                   keyflow CLI                    │
//! │          (plan / apply / refresh / destroy)      │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │               keyflow-resource                   │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │     Orchestrator + ResourceRegistry       │   │
//! │  │  trait Resource { create/read/delete }    │   │
//! │  └──────────────────────────────────────────┘   │
//! │  ┌──────────────┐  ┌──────────────┐            │
//! │  │  Plan/Action │  │  State Mgmt  │            │
//! │  └──────────────┘  └──────────────┘            │
//! └───────┬─────────────────────────────────────────┘
//!         │
//! ┌───────▼──────────────┐
//! │ github_user_gpg_key  │
//! │  (keyflow-github)    │
//! └──────────────────────┘
//! ```

pub mod action;
pub mod error;
pub mod orchestrator;
pub mod registry;
pub mod resource;
pub mod state;

// Re-exports
pub use action::{Action, ActionResult, ActionType, ApplyResult, Plan, PlanSummary};
pub use error::{ResourceError, Result};
pub use orchestrator::{Orchestrator, destroy_plan, plan};
pub use registry::ResourceRegistry;
pub use resource::{
    FieldKind, FieldSchema, Resource, ResourceConfig, ResourceSet, resource_key, split_key,
};
pub use state::{GlobalState, ResourceState, StateLock, StateManager};
