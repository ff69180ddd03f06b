//! Rendering of payloads and templates for the terminal.

use clap::ValueEnum;
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use termtree::Tree;

use crate::api::types::{DeploymentTemplate, ElasticsearchPayload, TopologyElement};
use crate::error::Error;
use crate::topology::{Size, format_size};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Table,
    Tree,
}

#[derive(Tabled)]
struct TopologyRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Instance configuration")]
    instance_configuration: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Zones")]
    zones: u32,
    #[tabled(rename = "Capabilities")]
    capabilities: String,
    #[tabled(rename = "Autoscaling")]
    autoscaling: String,
}

impl From<&TopologyElement> for TopologyRow {
    fn from(element: &TopologyElement) -> Self {
        Self {
            id: element.id.clone(),
            instance_configuration: element.instance_configuration_id.clone().unwrap_or_default(),
            size: element.size.map(|s| format_size(s.value)).unwrap_or_default(),
            zones: element.zone_count,
            capabilities: capabilities(element),
            autoscaling: autoscaling(element),
        }
    }
}

#[derive(Tabled)]
struct TemplateRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Topologies")]
    topologies: String,
}

fn capabilities(element: &TopologyElement) -> String {
    if let Some(roles) = &element.node_roles {
        return roles.join(",");
    }

    let Some(node_type) = element.node_type else {
        return String::new();
    };
    [
        ("data", node_type.data),
        ("master", node_type.master),
        ("ingest", node_type.ingest),
        ("ml", node_type.ml),
    ]
    .iter()
    .filter(|(_, enabled)| *enabled == Some(true))
    .map(|(name, _)| *name)
    .collect::<Vec<_>>()
    .join(",")
}

fn autoscaling(element: &TopologyElement) -> String {
    let bound = |size: Option<Size>| size.map(|s| format_size(s.value));
    match (bound(element.autoscaling_min), bound(element.autoscaling_max)) {
        (None, None) => "-".to_string(),
        (min, max) => format!(
            "{}..{}",
            min.unwrap_or_default(),
            max.unwrap_or_default()
        ),
    }
}

pub fn to_json<T: Serialize>(value: &T) -> Result<String, Error> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn render_payload(payload: &ElasticsearchPayload, format: OutputFormat) -> Result<String, Error> {
    match format {
        OutputFormat::Json => to_json(payload),
        OutputFormat::Table => Ok(topology_table(&payload.plan.cluster_topology)),
        OutputFormat::Tree => Ok(payload_tree(payload).to_string()),
    }
}

pub fn render_template(template: &DeploymentTemplate, format: OutputFormat) -> Result<String, Error> {
    match format {
        OutputFormat::Json => to_json(template),
        OutputFormat::Table => Ok(template
            .elasticsearch()
            .map(|es| topology_table(&es.plan.cluster_topology))
            .unwrap_or_default()),
        OutputFormat::Tree => Ok(template
            .elasticsearch()
            .map(|es| payload_tree(es).to_string())
            .unwrap_or_default()),
    }
}

pub fn template_table(templates: &[DeploymentTemplate]) -> String {
    let rows = templates.iter().map(|t| TemplateRow {
        id: t.id.clone(),
        name: t.name.clone(),
        topologies: t
            .elasticsearch()
            .map(|es| {
                es.plan
                    .cluster_topology
                    .iter()
                    .map(|e| e.id.as_str())
                    .collect::<Vec<_>>()
                    .join(",")
            })
            .unwrap_or_default(),
    });

    Table::new(rows).with(Style::rounded()).to_string()
}

fn topology_table(elements: &[TopologyElement]) -> String {
    Table::new(elements.iter().map(TopologyRow::from))
        .with(Style::rounded())
        .to_string()
}

fn payload_tree(payload: &ElasticsearchPayload) -> Tree<String> {
    let version = payload
        .plan
        .elasticsearch
        .version
        .as_deref()
        .unwrap_or("unknown");
    let mut root = Tree::new(format!("{} ({})", payload.ref_id, version));

    for element in &payload.plan.cluster_topology {
        let row = TopologyRow::from(element);
        let mut leaves = vec![
            format!("size: {}", row.size),
            format!("zones: {}", row.zones),
        ];
        if !row.instance_configuration.is_empty() {
            leaves.push(format!("instance configuration: {}", row.instance_configuration));
        }
        if !row.capabilities.is_empty() {
            leaves.push(format!("capabilities: {}", row.capabilities));
        }
        if row.autoscaling != "-" {
            leaves.push(format!("autoscaling: {}", row.autoscaling));
        }
        root.push(Tree::new(row.id).with_leaves(leaves));
    }

    root
}
