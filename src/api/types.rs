use serde::{Deserialize, Serialize};

use crate::topology::Size;

pub const DEFAULT_REF_ID: &str = "main-elasticsearch";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentTemplate {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub deployment_template: DeploymentCreateRequest,
    #[serde(default)]
    pub instance_configurations: Vec<InstanceConfiguration>,
}

impl DeploymentTemplate {
    /// The first Elasticsearch resource of the template, which carries the default topology.
    pub fn elasticsearch(&self) -> Option<&ElasticsearchPayload> {
        self.deployment_template.resources.elasticsearch.first()
    }

    pub fn instance_configuration(&self, id: &str) -> Option<&InstanceConfiguration> {
        self.instance_configurations.iter().find(|ic| ic.id == id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeploymentCreateRequest {
    #[serde(default)]
    pub resources: DeploymentResources,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeploymentResources {
    #[serde(default)]
    pub elasticsearch: Vec<ElasticsearchPayload>,
}

/// Elasticsearch resource as found in templates and as sent in create/update requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElasticsearchPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default = "default_ref_id")]
    pub ref_id: String,
    pub plan: ElasticsearchPlan,
}

fn default_ref_id() -> String {
    DEFAULT_REF_ID.to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElasticsearchPlan {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autoscaling_enabled: Option<bool>,
    #[serde(default)]
    pub cluster_topology: Vec<TopologyElement>,
    #[serde(default)]
    pub elasticsearch: ElasticsearchConfiguration,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_template: Option<DeploymentTemplateReference>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElasticsearchConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentTemplateReference {
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopologyElement {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_configuration_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    #[serde(default)]
    pub zone_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<NodeType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_roles: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topology_element_control: Option<TopologyElementControl>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autoscaling_max: Option<Size>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autoscaling_min: Option<Size>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autoscaling_policy_override_json: Option<serde_json::Value>,
}

/// Legacy capability flags, superseded by node roles from 7.10.0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingest: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ml: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TopologyElementControl {
    pub min: Size,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceConfiguration {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_zones: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discrete_sizes: Option<DiscreteSizes>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscreteSizes {
    #[serde(default)]
    pub sizes: Vec<u32>,
    #[serde(default)]
    pub default_size: u32,
    #[serde(default)]
    pub resource: crate::topology::SizeResource,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub errors: Vec<ApiErrorEntry>,
}

impl ApiErrorBody {
    pub fn first_message(&self) -> Option<&str> {
        self.errors.first().map(|e| e.message.as_str())
    }
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorEntry {
    #[serde(default)]
    #[allow(dead_code)] // NOTE: Kept for error logging
    pub code: String,
    pub message: String,
}
