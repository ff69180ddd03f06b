//! ectopo - Elastic Cloud topology planner
//!
//! Reconciles a declared Elasticsearch topology against a deployment template
//! and the previously applied state, producing the payload sent to the
//! deployments API.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod planner;
pub mod resource;
pub mod terraform;
pub mod topology;

pub use api::{ApiClient, ApiError, StaticTemplateService, TemplateService};
pub use error::{Diagnostic, Error};
pub use planner::{Planner, build_payload};
pub use resource::{DeploymentConfig, TierConfig};
pub use terraform::DeploymentState;
pub use topology::TopologyError;
