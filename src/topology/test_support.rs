use crate::api::types::{
    DeploymentCreateRequest, DeploymentResources, DeploymentTemplate, DiscreteSizes,
    ElasticsearchPayload, ElasticsearchPlan, InstanceConfiguration, NodeType, TopologyElement,
    TopologyElementControl,
};

use super::{Size, SizeResource};

pub(crate) fn element(id: &str, size: u32, zone_count: u32) -> TopologyElement {
    TopologyElement {
        id: id.to_string(),
        instance_configuration_id: Some(format!("aws.es.{}", id)),
        size: Some(Size::memory(size)),
        zone_count,
        ..Default::default()
    }
}

pub(crate) fn template_with(elements: Vec<TopologyElement>) -> DeploymentTemplate {
    let instance_configurations = elements
        .iter()
        .filter_map(|e| e.instance_configuration_id.clone())
        .map(|id| InstanceConfiguration {
            name: id.clone(),
            id,
            max_zones: Some(3),
            discrete_sizes: Some(DiscreteSizes {
                sizes: vec![1024, 2048, 4096, 8192, 65_536],
                default_size: 4096,
                resource: SizeResource::Memory,
            }),
        })
        .collect();

    DeploymentTemplate {
        id: "aws-io-optimized-v2".to_string(),
        name: "I/O Optimized".to_string(),
        deployment_template: DeploymentCreateRequest {
            resources: DeploymentResources {
                elasticsearch: vec![ElasticsearchPayload {
                    region: Some("us-east-1".to_string()),
                    ref_id: "main-elasticsearch".to_string(),
                    plan: ElasticsearchPlan {
                        autoscaling_enabled: Some(false),
                        cluster_topology: elements,
                        ..Default::default()
                    },
                }],
            },
        },
        instance_configurations,
    }
}

/// Hot and warm sized by default, every other tier present at zero.
pub(crate) fn standard_template() -> DeploymentTemplate {
    let mut hot = element("hot_content", 8192, 2);
    hot.node_type = Some(NodeType {
        data: Some(true),
        ingest: Some(true),
        master: Some(true),
        ml: None,
    });
    hot.autoscaling_max = Some(Size::memory(118_784));
    hot.topology_element_control = Some(TopologyElementControl {
        min: Size::memory(1024),
    });

    let mut warm = element("warm", 4096, 2);
    warm.autoscaling_max = Some(Size::memory(59_392));
    warm.topology_element_control = Some(TopologyElementControl {
        min: Size::zero(SizeResource::Memory),
    });

    let mut cold = element("cold", 0, 1);
    cold.autoscaling_max = Some(Size::memory(59_392));

    let mut frozen = element("frozen", 0, 1);
    frozen.autoscaling_max = Some(Size::memory(122_880));

    let mut ml = element("ml", 0, 1);
    ml.autoscaling_max = Some(Size::memory(61_440));
    ml.autoscaling_min = Some(Size::zero(SizeResource::Memory));

    let master = element("master", 0, 3);
    let coordinating = element("coordinating", 0, 2);

    template_with(vec![hot, warm, cold, frozen, ml, master, coordinating])
}
