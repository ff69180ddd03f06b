//! Node capability declaration: legacy `node_type` flags or `node_roles`.
//!
//! Node roles exist from Elasticsearch 7.10.0. The switch from flags to roles is
//! one-way: once a deployment's state records roles, later requests keep them.

use std::collections::BTreeMap;

use semver::Version;
use tracing::debug;

use crate::api::types::{NodeType, TopologyElement};

use super::{
    COLD, COORDINATING, FROZEN, HOT_CONTENT, MASTER, ML, ResolvedTier, TopologyError, WARM,
};

pub const NODE_ROLES_VERSION: Version = Version::new(7, 10, 0);

pub const DATA_ROLE_PREFIX: &str = "data_";
pub const MASTER_ROLE: &str = "master";
pub const INGEST_ROLE: &str = "ingest";

/// Outcome of comparing the previous and the requested version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRoleMode {
    /// Target version predates node roles.
    Legacy,
    /// New deployment, or an upgrade crossing 7.10.0.
    NodeRoles,
    /// Both versions support node roles; keep whatever state already uses.
    Preserve,
}

/// How a deployment's state expresses node capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Representation {
    NodeTypes,
    NodeRoles,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationContext {
    pub prior: Option<Representation>,
    /// Any topology size differs from state in this request.
    pub size_changed: bool,
    /// Configuration lists `node_roles` explicitly.
    pub roles_declared: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capabilities {
    NodeType(NodeType),
    NodeRoles(Vec<String>),
}

impl Capabilities {
    pub fn has_data(&self) -> bool {
        match self {
            Self::NodeType(flags) => flags.data == Some(true),
            Self::NodeRoles(roles) => roles.iter().any(|r| r.starts_with(DATA_ROLE_PREFIX)),
        }
    }

    /// Writes the declaration into the element, clearing the other representation.
    pub fn apply_to(&self, element: &mut TopologyElement) {
        match self {
            Self::NodeType(flags) => {
                element.node_type = Some(*flags);
                element.node_roles = None;
            }
            Self::NodeRoles(roles) => {
                element.node_roles = Some(roles.clone());
                element.node_type = None;
            }
        }
    }
}

fn parse_version(raw: &str) -> Result<Version, TopologyError> {
    Version::parse(raw.trim()).map_err(|source| TopologyError::InvalidVersion {
        version: raw.to_string(),
        source,
    })
}

/// Decides how capabilities are expressed given the previous and requested versions.
///
/// `old` is `None` (or empty) when the deployment is being created.
pub fn decide_node_role_mode(old: Option<&str>, new: &str) -> Result<NodeRoleMode, TopologyError> {
    let new = parse_version(new)?;
    let old = old
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(parse_version)
        .transpose()?;

    if new < NODE_ROLES_VERSION {
        return Ok(NodeRoleMode::Legacy);
    }

    Ok(match old {
        None => NodeRoleMode::NodeRoles,
        Some(old) if old < NODE_ROLES_VERSION => NodeRoleMode::NodeRoles,
        Some(_) => NodeRoleMode::Preserve,
    })
}

pub fn use_node_roles(mode: NodeRoleMode, context: &MigrationContext) -> bool {
    match mode {
        NodeRoleMode::Legacy => false,
        NodeRoleMode::NodeRoles => true,
        NodeRoleMode::Preserve => match context.prior {
            Some(Representation::NodeTypes) => context.size_changed || context.roles_declared,
            Some(Representation::NodeRoles) | None => true,
        },
    }
}

pub fn default_roles(tier_id: &str) -> Vec<String> {
    let roles: &[&str] = match tier_id {
        HOT_CONTENT => &[
            MASTER_ROLE,
            INGEST_ROLE,
            "remote_cluster_client",
            "data_hot",
            "transform",
            "data_content",
        ],
        WARM => &["data_warm", "remote_cluster_client"],
        COLD => &["data_cold", "remote_cluster_client"],
        FROZEN => &["data_frozen"],
        ML => &["ml", "remote_cluster_client"],
        MASTER => &[MASTER_ROLE, "remote_cluster_client"],
        COORDINATING => &[INGEST_ROLE, "remote_cluster_client"],
        _ => &[],
    };
    roles.iter().map(|r| r.to_string()).collect()
}

pub fn default_node_type(tier_id: &str) -> NodeType {
    let (data, ingest, master, ml) = match tier_id {
        HOT_CONTENT => (true, true, true, false),
        WARM | COLD | FROZEN => (true, false, false, false),
        ML => (false, false, false, true),
        MASTER => (false, false, true, false),
        COORDINATING => (false, true, false, false),
        _ => (false, false, false, false),
    };
    NodeType {
        data: Some(data),
        ingest: Some(ingest),
        master: Some(master),
        ml: Some(ml),
    }
}

fn dedup_preserving_order(roles: Vec<String>) -> Vec<String> {
    let mut seen = Vec::with_capacity(roles.len());
    for role in roles {
        if !seen.contains(&role) {
            seen.push(role);
        }
    }
    seen
}

/// Role lists for the complete tier set.
///
/// A sized tier holding `master` (or `ingest`) without any data role is a dedicated
/// tier; its presence removes that role from every data tier holding it.
pub fn resolve_roles(tiers: &[ResolvedTier]) -> BTreeMap<String, Vec<String>> {
    tiers
        .iter()
        .map(|tier| tier.id.clone())
        .zip(roles_in_order(tiers))
        .collect()
}

fn roles_in_order(tiers: &[ResolvedTier]) -> Vec<Vec<String>> {
    let mut resolved: Vec<Vec<String>> = tiers
        .iter()
        .map(|tier| {
            let roles = tier
                .node_roles
                .clone()
                .unwrap_or_else(|| default_roles(&tier.id));
            dedup_preserving_order(roles)
        })
        .collect();

    let has_data = |roles: &[String]| roles.iter().any(|r| r.starts_with(DATA_ROLE_PREFIX));
    let holds = |roles: &[String], role: &str| roles.iter().any(|r| r == role);

    let mut dedicated_master = false;
    let mut dedicated_ingest = false;
    for (tier, roles) in tiers.iter().zip(&resolved) {
        if tier.size.is_zero() || has_data(roles) {
            continue;
        }
        dedicated_master |= holds(roles, MASTER_ROLE);
        dedicated_ingest |= holds(roles, INGEST_ROLE);
    }

    for (tier, roles) in tiers.iter().zip(resolved.iter_mut()) {
        if !has_data(roles) {
            continue;
        }
        if dedicated_master && holds(roles, MASTER_ROLE) {
            debug!(tier = %tier.id, "dedicated master tier present, dropping master role");
            roles.retain(|r| r != MASTER_ROLE);
        }
        if dedicated_ingest && holds(roles, INGEST_ROLE) {
            debug!(tier = %tier.id, "dedicated coordinating tier present, dropping ingest role");
            roles.retain(|r| r != INGEST_ROLE);
        }
    }

    resolved
}

/// Legacy flags per tier, unset flags filled from the tier's defaults.
pub fn resolve_node_types(tiers: &[ResolvedTier]) -> BTreeMap<String, NodeType> {
    tiers
        .iter()
        .map(|tier| (tier.id.clone(), node_type_for(tier)))
        .collect()
}

fn node_type_for(tier: &ResolvedTier) -> NodeType {
    let defaults = default_node_type(&tier.id);
    NodeType {
        data: tier.node_type.data.or(defaults.data),
        ingest: tier.node_type.ingest.or(defaults.ingest),
        master: tier.node_type.master.or(defaults.master),
        ml: tier.node_type.ml.or(defaults.ml),
    }
}

/// One capability declaration per tier, in the same order as `tiers`.
pub fn assign_capabilities(tiers: &[ResolvedTier], use_node_roles: bool) -> Vec<Capabilities> {
    if use_node_roles {
        roles_in_order(tiers)
            .into_iter()
            .map(Capabilities::NodeRoles)
            .collect()
    } else {
        tiers
            .iter()
            .map(|tier| Capabilities::NodeType(node_type_for(tier)))
            .collect()
    }
}
