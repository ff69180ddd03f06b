use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;

use super::ApiError;
use super::types::{ApiErrorBody, DeploymentTemplate};

pub const DEFAULT_ENDPOINT: &str = "https://api.elastic-cloud.com";
const API_PREFIX: &str = "api/v1";

#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(api_key: String) -> Result<Self, ApiError> {
        Self::with_base_url(api_key, DEFAULT_ENDPOINT.to_string())
    }

    /// NOTE: Primarily used for testing with mock servers.
    pub fn with_base_url(api_key: String, base_url: String) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        let header_value = HeaderValue::from_str(&format!("ApiKey {}", api_key)).map_err(|_| {
            ApiError::Auth {
                message: "Invalid API key format".to_string(),
            }
        })?;
        headers.insert(AUTHORIZATION, header_value);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(ApiError::Network)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn api_base(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, ApiError> {
        let raw = format!("{}/{}/{}", self.base_url, API_PREFIX, path);
        Url::parse_with_params(&raw, params).map_err(|e| ApiError::InvalidEndpoint {
            endpoint: self.base_url.clone(),
            message: e.to_string(),
        })
    }

    pub async fn get_template(
        &self,
        template_id: &str,
        region: &str,
    ) -> Result<DeploymentTemplate, ApiError> {
        let url = self.url(
            &format!("deployments/templates/{}", template_id),
            &[("region", region), ("show_instance_configurations", "true")],
        )?;

        tracing::debug!(template_id, region, "fetching deployment template");

        match self.get_json(url, "deployment template").await {
            Err(ApiError::Api { status: 404, .. }) => Err(ApiError::TemplateNotFound {
                template_id: template_id.to_string(),
                region: region.to_string(),
            }),
            other => other,
        }
    }

    pub async fn list_templates(&self, region: &str) -> Result<Vec<DeploymentTemplate>, ApiError> {
        let url = self.url(
            "deployments/templates",
            &[("region", region), ("show_instance_configurations", "false")],
        )?;

        self.get_json(url, "deployment templates").await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, what: &str) -> Result<T, ApiError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(error_from_body(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| ApiError::Decode {
            what: what.to_string(),
            message: e.to_string(),
        })
    }
}

fn error_from_body(status: StatusCode, body: &str) -> ApiError {
    let parsed: ApiErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = parsed
        .first_message()
        .or_else(|| status.canonical_reason())
        .unwrap_or("Unknown error")
        .to_string();

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Auth { message },
        _ => ApiError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}
