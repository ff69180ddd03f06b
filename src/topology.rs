//! Topology reconciliation: turns a declared set of tiers plus a deployment
//! template into the topology elements sent to the control plane.
//!
//! The stages run in a fixed order, each consuming the previous one's output:
//! [`normalize`] resolves sizes, zones and instance configurations,
//! [`roles`] picks node roles or legacy node types over the whole tier set,
//! and [`autoscaling`] resolves autoscaling bounds per tier.

pub mod autoscaling;
pub mod normalize;
pub mod roles;
pub mod size;
pub mod template;

#[cfg(test)]
pub(crate) mod test_support;

use thiserror::Error;

pub use autoscaling::{AutoscalingBounds, TierDefaults, resolve_autoscaling};
pub use normalize::{DesiredTopology, ResolvedTier, normalize};
pub use roles::{
    Capabilities, MigrationContext, NodeRoleMode, Representation, assign_capabilities,
    decide_node_role_mode, resolve_node_types, resolve_roles, use_node_roles,
};
pub use size::{Size, SizeResource, format_size, parse_gb, parse_size};
pub use template::TemplateTopology;

pub const HOT_CONTENT: &str = "hot_content";
pub const WARM: &str = "warm";
pub const COLD: &str = "cold";
pub const FROZEN: &str = "frozen";
pub const ML: &str = "ml";
pub const MASTER: &str = "master";
pub const COORDINATING: &str = "coordinating";

#[derive(Debug, Error)]
pub enum TopologyError {
    /// A declared tier that the template does not define
    #[error("invalid id ('{id}'): valid topology IDs are {valid}")]
    UnknownTier { id: String, valid: String },

    #[error("invalid size value '{value}': {reason}")]
    InvalidSize { value: String, reason: String },

    #[error("failed reading deployment: {source}")]
    InvalidVersion {
        version: String,
        #[source]
        source: semver::Error,
    },

    #[error("invalid zone_count {zone_count} for topology {tier}: {reason}")]
    InvalidZoneCount {
        tier: String,
        zone_count: u32,
        reason: String,
    },

    #[error("topology {tier} has no instance_configuration_id and the template provides none")]
    MissingInstanceConfiguration { tier: String },

    #[error("no autoscaling max size available for topology {tier}")]
    MissingAutoscalingMax { tier: String },

    #[error("elasticsearch topology {tier}: unable to load policy_override_json: {source}")]
    InvalidPolicyOverride {
        tier: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("deployment template '{template_id}' has no elasticsearch resource")]
    MissingElasticsearchTemplate { template_id: String },
}

impl TopologyError {
    pub(crate) fn invalid_size(value: &str, reason: impl Into<String>) -> Self {
        Self::InvalidSize {
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Short title used when the error is surfaced as a diagnostic.
    pub fn summary(&self) -> &'static str {
        match self {
            Self::UnknownTier { .. } => "topology matching error",
            Self::InvalidSize { .. } => "failed parsing topology size",
            Self::InvalidVersion { .. } => "failed to determine whether to use node_roles",
            Self::InvalidZoneCount { .. } => "invalid zone count",
            Self::MissingInstanceConfiguration { .. } => "missing instance configuration",
            Self::MissingAutoscalingMax { .. } => "autoscaling error",
            Self::InvalidPolicyOverride { .. } => "autoscaling error",
            Self::MissingElasticsearchTemplate { .. } => "deployment template error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_tier_display() {
        let err = TopologyError::UnknownTier {
            id: "hot".to_string(),
            valid: "\"hot_content\", \"warm\"".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid id ('hot'): valid topology IDs are \"hot_content\", \"warm\""
        );
    }

    #[test]
    fn test_invalid_size_display() {
        let err = TopologyError::invalid_size("4", "missing 'g' suffix");
        assert_eq!(err.to_string(), "invalid size value '4': missing 'g' suffix");
    }

    #[test]
    fn test_invalid_version_display_prefix() {
        let source = semver::Version::parse("seven").unwrap_err();
        let err = TopologyError::InvalidVersion {
            version: "seven".to_string(),
            source,
        };
        assert!(err.to_string().starts_with("failed reading deployment: "));
    }

    #[test]
    fn test_summary_for_unknown_tier() {
        let err = TopologyError::UnknownTier {
            id: "x".to_string(),
            valid: String::new(),
        };
        assert_eq!(err.summary(), "topology matching error");
    }
}
