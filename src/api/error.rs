use thiserror::Error;

/// Errors raised while talking to the deployments API.
///
/// SECURITY: Error messages must NEVER contain the API key.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The API key was rejected
    #[error("authentication failed: {message}")]
    Auth { message: String },

    /// API returned an error response
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Network-level error (connection failed, timeout, etc.)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("deployment template '{template_id}' not found in region '{region}'")]
    TemplateNotFound { template_id: String, region: String },

    /// Response body did not match the expected shape
    #[error("failed to decode {what}: {message}")]
    Decode { what: String, message: String },

    #[error("invalid endpoint '{endpoint}': {message}")]
    InvalidEndpoint { endpoint: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_display() {
        let err = ApiError::Auth {
            message: "The supplied authentication is invalid".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "authentication failed: The supplied authentication is invalid"
        );
    }

    #[test]
    fn test_api_error_display() {
        let err = ApiError::Api {
            status: 500,
            message: "Internal Server Error".to_string(),
        };
        assert_eq!(err.to_string(), "API error (500): Internal Server Error");
    }

    #[test]
    fn test_template_not_found_display() {
        let err = ApiError::TemplateNotFound {
            template_id: "aws-io-optimized-v2".to_string(),
            region: "us-east-1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "deployment template 'aws-io-optimized-v2' not found in region 'us-east-1'"
        );
    }

    #[test]
    fn test_decode_error_display() {
        let err = ApiError::Decode {
            what: "deployment template".to_string(),
            message: "missing field `id`".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "failed to decode deployment template: missing field `id`"
        );
    }

    #[test]
    fn test_error_does_not_contain_key() {
        let fake_key = "essu_super_secret_key_12345";
        let err = ApiError::Auth {
            message: "Invalid API key".to_string(),
        };

        assert!(
            !err.to_string().contains(fake_key),
            "Error message should not contain key value"
        );
    }
}
