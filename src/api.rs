pub mod client;
pub mod error;
pub mod types;

use std::collections::HashMap;

use async_trait::async_trait;

pub use client::ApiClient;
pub use error::ApiError;
pub use types::DeploymentTemplate;

/// Source of deployment templates.
#[async_trait]
pub trait TemplateService: Send + Sync {
    async fn get_template(
        &self,
        template_id: &str,
        region: &str,
    ) -> Result<DeploymentTemplate, ApiError>;
}

#[async_trait]
impl TemplateService for ApiClient {
    async fn get_template(
        &self,
        template_id: &str,
        region: &str,
    ) -> Result<DeploymentTemplate, ApiError> {
        ApiClient::get_template(self, template_id, region).await
    }
}

/// Serves templates held in memory, whatever the region.
#[derive(Debug, Clone, Default)]
pub struct StaticTemplateService {
    templates: HashMap<String, DeploymentTemplate>,
}

impl StaticTemplateService {
    pub fn new(templates: impl IntoIterator<Item = DeploymentTemplate>) -> Self {
        Self {
            templates: templates.into_iter().map(|t| (t.id.clone(), t)).collect(),
        }
    }
}

#[async_trait]
impl TemplateService for StaticTemplateService {
    async fn get_template(
        &self,
        template_id: &str,
        region: &str,
    ) -> Result<DeploymentTemplate, ApiError> {
        self.templates
            .get(template_id)
            .cloned()
            .ok_or_else(|| ApiError::TemplateNotFound {
                template_id: template_id.to_string(),
                region: region.to_string(),
            })
    }
}

/// Picks the template source: a local file when given, the API otherwise.
pub fn get_template_service(
    template_file: Option<DeploymentTemplate>,
    api_key: Option<String>,
    endpoint: &str,
) -> Result<Box<dyn TemplateService>, ApiError> {
    if let Some(template) = template_file {
        return Ok(Box::new(StaticTemplateService::new([template])));
    }

    Ok(Box::new(api_client(api_key, endpoint)?))
}

pub fn api_client(api_key: Option<String>, endpoint: &str) -> Result<ApiClient, ApiError> {
    let api_key = api_key.ok_or_else(|| ApiError::Auth {
        message: "No API key provided. Set EC_API_KEY or use --api-key flag".to_string(),
    })?;

    ApiClient::with_base_url(api_key, endpoint.to_string())
}
