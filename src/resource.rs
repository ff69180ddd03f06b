use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::topology::SizeResource;

/// Declared deployment, as written by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DeploymentConfig {
    pub deployment_template_id: String,
    pub region: String,
    pub version: String,
    #[serde(default)]
    pub elasticsearch: ElasticsearchConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElasticsearchConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autoscale: Option<bool>,
    /// Tiers keyed by topology id (`hot_content`, `warm`, ...).
    #[serde(default)]
    pub tiers: BTreeMap<String, TierConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TierConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_configuration_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_resource: Option<SizeResource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_type_data: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_type_master: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_type_ingest: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_type_ml: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_roles: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autoscaling: Option<AutoscalingConfig>,
}

impl TierConfig {
    pub fn has_node_types(&self) -> bool {
        self.node_type_data.is_some()
            || self.node_type_master.is_some()
            || self.node_type_ingest.is_some()
            || self.node_type_ml.is_some()
    }

    pub fn has_node_roles(&self) -> bool {
        self.node_roles.as_ref().is_some_and(|roles| !roles.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AutoscalingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_size_resource: Option<SizeResource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_size_resource: Option<SizeResource>,
    /// Passed to the API untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_override_json: Option<String>,
}

impl AutoscalingConfig {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
