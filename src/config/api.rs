use super::defaults::default_request_timeout;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            request_timeout: default_request_timeout(),
        }
    }
}

/// Normalize a user supplied base URL to the versioned Gemini API root.
pub fn normalize_endpoint(endpoint: &str) -> String {
    let endpoint = endpoint.trim().trim_end_matches('/');
    let versioned = ["/v1", "/v1beta", "/v1alpha"]
        .iter()
        .any(|suffix| endpoint.ends_with(suffix));

    if versioned {
        endpoint.to_string()
    } else {
        format!("{}/v1beta", endpoint)
    }
}
