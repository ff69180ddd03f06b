//! Builds Elasticsearch create/update payloads from declared configuration.

use std::collections::BTreeMap;

use tracing::info;

use crate::api::TemplateService;
use crate::api::types::{
    DeploymentTemplate, DeploymentTemplateReference, ElasticsearchConfiguration,
    ElasticsearchPayload, ElasticsearchPlan, TopologyElement,
};
use crate::error::Error;
use crate::resource::{DeploymentConfig, TierConfig};
use crate::terraform::DeploymentState;
use crate::topology::{
    DesiredTopology, MigrationContext, ResolvedTier, TemplateTopology, TierDefaults,
    TopologyError, assign_capabilities, decide_node_role_mode, normalize, resolve_autoscaling,
    use_node_roles,
};

pub struct Planner {
    templates: Box<dyn TemplateService>,
}

impl Planner {
    pub fn new(templates: Box<dyn TemplateService>) -> Self {
        Self { templates }
    }

    pub async fn create_payload(
        &self,
        config: &DeploymentConfig,
    ) -> Result<ElasticsearchPayload, Error> {
        self.plan(config, None).await
    }

    pub async fn update_payload(
        &self,
        config: &DeploymentConfig,
        state: &DeploymentState,
    ) -> Result<ElasticsearchPayload, Error> {
        self.plan(config, Some(state)).await
    }

    async fn plan(
        &self,
        config: &DeploymentConfig,
        state: Option<&DeploymentState>,
    ) -> Result<ElasticsearchPayload, Error> {
        let template = self
            .templates
            .get_template(&config.deployment_template_id, &config.region)
            .await
            .map_err(Error::TemplateGet)?;

        info!(
            template_id = %template.id,
            region = %config.region,
            "deployment template fetched"
        );

        let payload = build_payload(&template, config, state)?;

        info!(
            tiers = payload.plan.cluster_topology.len(),
            "elasticsearch payload built"
        );

        Ok(payload)
    }
}

/// Normalizes tiers, settles node roles, resolves autoscaling, then assembles
/// the payload. Nothing is returned unless every tier resolves.
pub fn build_payload(
    template: &DeploymentTemplate,
    config: &DeploymentConfig,
    state: Option<&DeploymentState>,
) -> Result<ElasticsearchPayload, TopologyError> {
    let topology = TemplateTopology::new(template)?;

    let template_changed =
        state.is_some_and(|s| s.deployment_template_id != config.deployment_template_id);
    if template_changed {
        info!(
            template_id = %config.deployment_template_id,
            "deployment template changed, undeclared topologies are not carried over"
        );
    }

    let desired = DesiredTopology {
        declared: config.elasticsearch.tiers.clone(),
        inherited: match state {
            Some(state) if !template_changed => state.elasticsearch.tiers.clone(),
            _ => BTreeMap::new(),
        },
    };
    let tiers = normalize(&desired, &topology, template_changed)?;

    let mode = decide_node_role_mode(state.map(|s| s.version.as_str()), &config.version)?;
    let context = MigrationContext {
        prior: state.and_then(DeploymentState::representation),
        size_changed: sizes_changed(&tiers, state)?,
        roles_declared: config
            .elasticsearch
            .tiers
            .values()
            .any(TierConfig::has_node_roles),
    };
    let node_roles = use_node_roles(mode, &context);
    info!(?mode, node_roles, "node capability representation selected");

    let capabilities = assign_capabilities(&tiers, node_roles);

    let autoscaling_enabled = config
        .elasticsearch
        .autoscale
        .or_else(|| state.and_then(|s| s.elasticsearch.autoscale))
        .or_else(|| topology.autoscaling_enabled())
        .unwrap_or(false);

    let mut cluster_topology = Vec::with_capacity(tiers.len());
    for (tier, capabilities) in tiers.iter().zip(&capabilities) {
        let defaults =
            TierDefaults::lookup(&topology, tier).ok_or_else(|| topology.unknown_tier(&tier.id))?;
        let bounds = resolve_autoscaling(tier, capabilities, &defaults, autoscaling_enabled)?;

        let mut element = TopologyElement {
            id: tier.id.clone(),
            instance_configuration_id: Some(tier.instance_configuration_id.clone()),
            size: Some(tier.size),
            zone_count: tier.zone_count,
            ..Default::default()
        };
        capabilities.apply_to(&mut element);
        bounds.apply_to(&mut element);
        cluster_topology.push(element);
    }

    let ref_id = config
        .elasticsearch
        .ref_id
        .clone()
        .unwrap_or_else(|| topology.ref_id().to_string());

    Ok(ElasticsearchPayload {
        region: Some(config.region.clone()),
        ref_id,
        plan: ElasticsearchPlan {
            autoscaling_enabled: Some(autoscaling_enabled),
            cluster_topology,
            elasticsearch: ElasticsearchConfiguration {
                version: Some(config.version.clone()),
            },
            deployment_template: Some(DeploymentTemplateReference {
                id: config.deployment_template_id.clone(),
            }),
        },
    })
}

/// Whether any topology size differs from what state recorded, including
/// tiers appearing or disappearing.
fn sizes_changed(
    tiers: &[ResolvedTier],
    state: Option<&DeploymentState>,
) -> Result<bool, TopologyError> {
    let Some(state) = state else {
        return Ok(false);
    };

    for tier in tiers {
        let recorded = state.tier_size(&tier.id)?.map(|s| s.value).unwrap_or(0);
        if recorded != tier.size.value {
            return Ok(true);
        }
    }

    for id in state.elasticsearch.tiers.keys() {
        if tiers.iter().any(|t| &t.id == id) {
            continue;
        }
        if state.tier_size(id)?.is_some_and(|s| !s.is_zero()) {
            return Ok(true);
        }
    }

    Ok(false)
}
