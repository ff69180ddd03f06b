//! Recorded state of a deployment after the previous apply.
//!
//! State shares the declared configuration's shape, with every value filled in
//! and sizes flattened back to their `"Ng"` form.

use serde::{Deserialize, Serialize};

use crate::api::types::{ElasticsearchPayload, TopologyElement};
use crate::resource::{AutoscalingConfig, DeploymentConfig, ElasticsearchConfig, TierConfig};
use crate::topology::{Representation, Size, TopologyError, format_size, parse_size};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentState {
    pub deployment_template_id: String,
    pub region: String,
    pub version: String,
    #[serde(default)]
    pub elasticsearch: ElasticsearchConfig,
}

impl DeploymentState {
    /// Builds the next state from the configuration and the payload that was applied.
    pub fn flatten(config: &DeploymentConfig, payload: &ElasticsearchPayload) -> Self {
        let tiers = payload
            .plan
            .cluster_topology
            .iter()
            .map(|element| (element.id.clone(), flatten_element(element)))
            .collect();

        Self {
            deployment_template_id: config.deployment_template_id.clone(),
            region: config.region.clone(),
            version: payload
                .plan
                .elasticsearch
                .version
                .clone()
                .unwrap_or_else(|| config.version.clone()),
            elasticsearch: ElasticsearchConfig {
                ref_id: Some(payload.ref_id.clone()),
                autoscale: payload.plan.autoscaling_enabled,
                tiers,
            },
        }
    }

    /// Whether the recorded tiers use node roles or legacy node types.
    pub fn representation(&self) -> Option<Representation> {
        let tiers = self.elasticsearch.tiers.values();
        if tiers.clone().any(TierConfig::has_node_roles) {
            Some(Representation::NodeRoles)
        } else if tiers.clone().any(TierConfig::has_node_types) {
            Some(Representation::NodeTypes)
        } else {
            None
        }
    }

    /// Recorded size of a tier, `None` when the tier is absent or unsized.
    pub fn tier_size(&self, id: &str) -> Result<Option<Size>, TopologyError> {
        let Some(tier) = self.elasticsearch.tiers.get(id) else {
            return Ok(None);
        };
        tier.size
            .as_deref()
            .map(|raw| parse_size(raw, tier.size_resource.unwrap_or_default()))
            .transpose()
    }
}

fn flatten_element(element: &TopologyElement) -> TierConfig {
    let node_type = element.node_type.unwrap_or_default();

    TierConfig {
        instance_configuration_id: element.instance_configuration_id.clone(),
        size: element.size.map(|s| format_size(s.value)),
        size_resource: element.size.map(|s| s.resource),
        zone_count: Some(element.zone_count),
        node_type_data: node_type.data,
        node_type_master: node_type.master,
        node_type_ingest: node_type.ingest,
        node_type_ml: node_type.ml,
        node_roles: element.node_roles.clone(),
        autoscaling: flatten_autoscaling(element),
    }
}

fn flatten_autoscaling(element: &TopologyElement) -> Option<AutoscalingConfig> {
    let autoscaling = AutoscalingConfig {
        max_size: element.autoscaling_max.map(|s| format_size(s.value)),
        max_size_resource: element.autoscaling_max.map(|s| s.resource),
        min_size: element.autoscaling_min.map(|s| format_size(s.value)),
        min_size_resource: element.autoscaling_min.map(|s| s.resource),
        policy_override_json: element
            .autoscaling_policy_override_json
            .as_ref()
            .map(|v| v.to_string()),
    };

    (!autoscaling.is_empty()).then_some(autoscaling)
}
