use tracing::debug;

use crate::api::types::{InstanceConfiguration, TopologyElement, TopologyElementControl};

use super::{Capabilities, ResolvedTier, Size, TemplateTopology, TopologyError, parse_size};

/// Template data backing a single tier.
#[derive(Debug, Clone, Copy)]
pub struct TierDefaults<'a> {
    pub element: &'a TopologyElement,
    pub instance_configuration: Option<&'a InstanceConfiguration>,
}

impl<'a> TierDefaults<'a> {
    pub fn lookup(template: &TemplateTopology<'a>, tier: &ResolvedTier) -> Option<Self> {
        let element = template.element(&tier.id)?;
        Some(Self {
            element,
            instance_configuration: template.instance_configuration(&tier.instance_configuration_id),
        })
    }

    fn largest_discrete_size(&self) -> Option<Size> {
        let sizes = self.instance_configuration?.discrete_sizes.as_ref()?;
        sizes
            .sizes
            .iter()
            .max()
            .map(|value| Size::new(sizes.resource, *value))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AutoscalingBounds {
    pub max: Option<Size>,
    pub min: Option<Size>,
    /// Floor the control plane keeps the tier at, independent of autoscaling.
    pub control_min: Option<Size>,
    pub policy_override: Option<serde_json::Value>,
}

impl AutoscalingBounds {
    pub fn apply_to(&self, element: &mut TopologyElement) {
        element.autoscaling_max = self.max;
        element.autoscaling_min = self.min;
        element.autoscaling_policy_override_json = self.policy_override.clone();
        element.topology_element_control = self.control_min.map(|min| TopologyElementControl { min });
    }
}

/// Resolves autoscaling bounds for one tier.
///
/// With autoscaling disabled only the control minimum survives. With it enabled
/// the max bound comes from configuration, then the template, then the largest
/// size the instance configuration offers.
pub fn resolve_autoscaling(
    tier: &ResolvedTier,
    capabilities: &Capabilities,
    defaults: &TierDefaults<'_>,
    enabled: bool,
) -> Result<AutoscalingBounds, TopologyError> {
    let control_min = defaults
        .element
        .topology_element_control
        .map(|control| control.min)
        .or_else(|| (!capabilities.has_data()).then(|| Size::zero(tier.size.resource)));

    if !enabled {
        if tier.autoscaling.as_ref().is_some_and(|a| !a.is_empty()) {
            debug!(tier = %tier.id, "autoscaling disabled, ignoring autoscaling settings");
        }
        return Ok(AutoscalingBounds {
            control_min,
            ..Default::default()
        });
    }

    let declared = tier.autoscaling.clone().unwrap_or_default();

    let max = match declared.max_size.as_deref() {
        Some(raw) => parse_size(raw, declared.max_size_resource.unwrap_or(tier.size.resource))?,
        None => defaults
            .element
            .autoscaling_max
            .or_else(|| defaults.largest_discrete_size())
            .ok_or_else(|| TopologyError::MissingAutoscalingMax {
                tier: tier.id.clone(),
            })?,
    };

    let min = match declared.min_size.as_deref() {
        Some(raw) => Some(parse_size(
            raw,
            declared.min_size_resource.unwrap_or(tier.size.resource),
        )?),
        None => defaults.element.autoscaling_min,
    };

    let policy_override = declared
        .policy_override_json
        .as_deref()
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .map(|raw| {
            serde_json::from_str(raw).map_err(|source| TopologyError::InvalidPolicyOverride {
                tier: tier.id.clone(),
                source,
            })
        })
        .transpose()?;

    debug!(
        tier = %tier.id,
        max = max.value,
        min = ?min.map(|s| s.value),
        "autoscaling resolved"
    );

    Ok(AutoscalingBounds {
        max: Some(max),
        min,
        control_min,
        policy_override,
    })
}
