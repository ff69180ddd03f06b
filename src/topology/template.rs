use crate::api::types::{
    DeploymentTemplate, ElasticsearchPayload, InstanceConfiguration, TopologyElement,
};

use super::TopologyError;

/// Read-only view over the Elasticsearch defaults of a fetched deployment template.
#[derive(Debug, Clone, Copy)]
pub struct TemplateTopology<'a> {
    template: &'a DeploymentTemplate,
    elasticsearch: &'a ElasticsearchPayload,
}

impl<'a> TemplateTopology<'a> {
    pub fn new(template: &'a DeploymentTemplate) -> Result<Self, TopologyError> {
        let elasticsearch =
            template
                .elasticsearch()
                .ok_or_else(|| TopologyError::MissingElasticsearchTemplate {
                    template_id: template.id.clone(),
                })?;

        Ok(Self {
            template,
            elasticsearch,
        })
    }

    pub fn template_id(&self) -> &'a str {
        &self.template.id
    }

    pub fn ref_id(&self) -> &'a str {
        &self.elasticsearch.ref_id
    }

    pub fn autoscaling_enabled(&self) -> Option<bool> {
        self.elasticsearch.plan.autoscaling_enabled
    }

    /// Template elements in their declared order.
    pub fn elements(&self) -> &'a [TopologyElement] {
        &self.elasticsearch.plan.cluster_topology
    }

    pub fn element(&self, id: &str) -> Option<&'a TopologyElement> {
        self.elements().iter().find(|e| e.id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &'a str> + 'a {
        self.elements().iter().map(|e| e.id.as_str())
    }

    pub fn instance_configuration(&self, id: &str) -> Option<&'a InstanceConfiguration> {
        self.template.instance_configuration(id)
    }

    /// Error for a tier id the template does not define, listing the valid ids.
    pub fn unknown_tier(&self, id: &str) -> TopologyError {
        let valid = self
            .ids()
            .map(|id| format!("\"{}\"", id))
            .collect::<Vec<_>>()
            .join(", ");

        TopologyError::UnknownTier {
            id: id.to_string(),
            valid,
        }
    }
}
