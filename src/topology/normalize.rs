use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::api::types::{NodeType, TopologyElement};
use crate::resource::{AutoscalingConfig, TierConfig};

use super::{Size, SizeResource, TemplateTopology, TopologyError, parse_size};

/// The tiers a request asks for.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DesiredTopology {
    /// Tiers declared in configuration.
    pub declared: BTreeMap<String, TierConfig>,
    /// Tiers carried over from prior state. Empty on create, or when the template changed.
    pub inherited: BTreeMap<String, TierConfig>,
}

impl DesiredTopology {
    pub fn declared(declared: BTreeMap<String, TierConfig>) -> Self {
        Self {
            declared,
            inherited: BTreeMap::new(),
        }
    }
}

/// One tier after template defaults have been merged in.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTier {
    pub id: String,
    pub instance_configuration_id: String,
    pub size: Size,
    pub zone_count: u32,
    /// Whether the tier appears in configuration, as opposed to state or template defaults.
    pub declared: bool,
    pub node_type: NodeType,
    /// Explicit role list, only ever taken from configuration.
    pub node_roles: Option<Vec<String>>,
    pub autoscaling: Option<AutoscalingConfig>,
}

/// Merges declared and inherited tiers over the template's defaults.
///
/// Tiers come out in template order. A declared tier the template does not know
/// is an error. When `skip_missing_tiers` is set, undeclared tiers are left out
/// instead of being defaulted. Undeclared tiers that end up with a zero size are
/// dropped.
pub fn normalize(
    desired: &DesiredTopology,
    template: &TemplateTopology<'_>,
    skip_missing_tiers: bool,
) -> Result<Vec<ResolvedTier>, TopologyError> {
    if let Some(unknown) = desired
        .declared
        .keys()
        .find(|id| template.element(id).is_none())
    {
        return Err(template.unknown_tier(unknown));
    }

    for id in desired
        .inherited
        .keys()
        .filter(|id| template.element(id).is_none())
    {
        warn!(tier = %id, "ignoring state topology missing from the template");
    }

    let mut resolved = Vec::new();

    for element in template.elements() {
        let declared = desired.declared.get(&element.id);

        if declared.is_none() && skip_missing_tiers {
            debug!(tier = %element.id, "skipping undeclared topology after template change");
            continue;
        }

        let layers = [declared, desired.inherited.get(&element.id)];
        let Some(tier) = resolve_tier(element, &layers, declared)? else {
            debug!(tier = %element.id, "dropping undeclared zero-sized topology");
            continue;
        };

        validate_zone_count(&tier, template)?;

        debug!(
            tier = %tier.id,
            size = tier.size.value,
            zone_count = tier.zone_count,
            declared = tier.declared,
            "topology resolved"
        );
        resolved.push(tier);
    }

    Ok(resolved)
}

/// First value any layer provides, most specific layer first.
fn layered<T>(layers: &[Option<&TierConfig>], f: impl Fn(&TierConfig) -> Option<T>) -> Option<T> {
    layers.iter().flatten().find_map(|tier| f(*tier))
}

/// `None` when the tier is undeclared and resolves to a zero size.
fn resolve_tier(
    element: &TopologyElement,
    layers: &[Option<&TierConfig>],
    declared: Option<&TierConfig>,
) -> Result<Option<ResolvedTier>, TopologyError> {
    let explicit_resource = layered(layers, |t| t.size_resource);
    let size = match layered(layers, |t| t.size.clone()) {
        Some(raw) => {
            let resource = explicit_resource
                .or_else(|| element.size.map(|s| s.resource))
                .unwrap_or_default();
            parse_size(&raw, resource)?
        }
        None => {
            let default = element.size.unwrap_or(Size::zero(SizeResource::default()));
            Size::new(explicit_resource.unwrap_or(default.resource), default.value)
        }
    };

    if declared.is_none() && size.is_zero() {
        return Ok(None);
    }

    let instance_configuration_id = layered(layers, |t| t.instance_configuration_id.clone())
        .or_else(|| element.instance_configuration_id.clone())
        .ok_or_else(|| TopologyError::MissingInstanceConfiguration {
            tier: element.id.clone(),
        })?;

    let zone_count = layered(layers, |t| t.zone_count).unwrap_or(element.zone_count);

    let defaults = element.node_type.unwrap_or_default();
    let node_type = NodeType {
        data: layered(layers, |t| t.node_type_data).or(defaults.data),
        ingest: layered(layers, |t| t.node_type_ingest).or(defaults.ingest),
        master: layered(layers, |t| t.node_type_master).or(defaults.master),
        ml: layered(layers, |t| t.node_type_ml).or(defaults.ml),
    };

    Ok(Some(ResolvedTier {
        id: element.id.clone(),
        instance_configuration_id,
        size,
        zone_count,
        declared: declared.is_some(),
        node_type,
        // State records roles after cross-tier adjustment, so only declared
        // roles are carried forward.
        node_roles: declared
            .and_then(|t| t.node_roles.clone())
            .filter(|roles| !roles.is_empty()),
        autoscaling: layered(layers, |t| t.autoscaling.clone()),
    }))
}

fn validate_zone_count(
    tier: &ResolvedTier,
    template: &TemplateTopology<'_>,
) -> Result<(), TopologyError> {
    if tier.size.is_zero() {
        return Ok(());
    }

    if tier.zone_count == 0 {
        return Err(TopologyError::InvalidZoneCount {
            tier: tier.id.clone(),
            zone_count: 0,
            reason: "must be a positive integer".to_string(),
        });
    }

    let max_zones = template
        .instance_configuration(&tier.instance_configuration_id)
        .and_then(|ic| ic.max_zones);

    match max_zones {
        Some(max) if tier.zone_count > max => Err(TopologyError::InvalidZoneCount {
            tier: tier.id.clone(),
            zone_count: tier.zone_count,
            reason: format!(
                "instance configuration {} supports at most {} zones",
                tier.instance_configuration_id, max
            ),
        }),
        _ => Ok(()),
    }
}
