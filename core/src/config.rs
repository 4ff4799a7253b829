//! Client configuration: the API base URL and the storage key of the bearer
//! token, read from the environment.

use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_JWT_STORAGE_KEY: &str = "fiap.jwt";

/// Where the API lives and where its token is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub jwt_storage_key: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            jwt_storage_key: DEFAULT_JWT_STORAGE_KEY.to_string(),
        }
    }
}

impl ApiConfig {
    /// Load configuration from `API_BASE_URL` and `JWT_STORAGE_KEY`.
    ///
    /// # Errors
    ///
    /// Returns an error if `API_BASE_URL` is not an absolute http(s) URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str, fallback: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| fallback.to_string())
        };

        let config = Self {
            base_url: var("API_BASE_URL", DEFAULT_BASE_URL),
            jwt_storage_key: var("JWT_STORAGE_KEY", DEFAULT_JWT_STORAGE_KEY),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue { name: "API_BASE_URL".to_string(), message };
        let url = Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {:?}", url.scheme())));
        }
        Ok(())
    }
}
