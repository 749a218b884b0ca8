//! Client configuration.

use std::env;

use crate::error::ApiError;

/// Environment variable read by [`ClientConfig::from_env`].
pub const BASE_URL_VAR: &str = "ALFRESCO_URL";

/// Immutable settings a client is constructed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Server root, e.g. `https://repo.example.com`, without the `/alfresco`
    /// context path.
    pub base_url: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ApiError::Config("base URL is empty".into()));
        }
        Ok(Self { base_url })
    }

    pub fn from_env() -> Result<Self, ApiError> {
        let base_url =
            env::var(BASE_URL_VAR).map_err(|_| ApiError::Config(format!("missing {BASE_URL_VAR}")))?;
        Self::new(base_url)
    }
}
