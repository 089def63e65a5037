//! Client configuration types.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CloudStackError, CloudStackResult};
use crate::http::PollPolicy;

/// Environment variable holding the API endpoint.
pub const ENV_API_URL: &str = "CLOUDSTACK_API_URL";
/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "CLOUDSTACK_API_KEY";
/// Environment variable holding the secret key.
pub const ENV_SECRET_KEY: &str = "CLOUDSTACK_SECRET_KEY";

/// CloudStack client configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Management server API endpoint, e.g. `https://cloud.example.com/client/api`.
    pub api_url: String,

    /// API key used to identify the caller.
    /// Can be a direct value or an environment variable reference: `$MY_KEY`.
    pub api_key: String,

    /// Secret key used to sign requests.
    /// Can be a direct value or an environment variable reference: `$MY_SECRET`.
    pub secret_key: String,

    /// Wait for async jobs to finish before returning.
    #[serde(default = "default_async_mode")]
    pub async_mode: bool,

    /// How long to wait for an async job, in seconds.
    #[serde(default = "default_async_timeout_secs")]
    pub async_timeout_secs: u64,

    /// Never use POST, for providers that only accept GET.
    #[serde(default)]
    pub http_get_only: bool,

    /// Skip TLS certificate and hostname verification.
    #[serde(default)]
    pub ssl_no_verify: bool,

    /// Per-request HTTP timeout in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Delay between job status queries.
    #[serde(default)]
    pub poll: PollPolicy,

    /// Project applied to lookup helpers by default.
    #[serde(default)]
    pub project_id: Option<String>,

    /// Zone applied to lookup helpers by default.
    #[serde(default)]
    pub zone_id: Option<String>,
}

fn default_async_mode() -> bool {
    true
}

fn default_async_timeout_secs() -> u64 {
    300
}

fn default_request_timeout_ms() -> u64 {
    60000
}

impl ClientConfig {
    /// Create a config for the given endpoint and credentials.
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        Self {
            api_url: api_url.into(),
            api_key: api_key.into(),
            secret_key: secret_key.into(),
            async_mode: default_async_mode(),
            async_timeout_secs: default_async_timeout_secs(),
            http_get_only: false,
            ssl_no_verify: false,
            request_timeout_ms: default_request_timeout_ms(),
            poll: PollPolicy::default(),
            project_id: None,
            zone_id: None,
        }
    }

    /// Create a config from `CLOUDSTACK_API_URL`, `CLOUDSTACK_API_KEY` and
    /// `CLOUDSTACK_SECRET_KEY`.
    pub fn from_env() -> CloudStackResult<Self> {
        let read = |name: &str| {
            std::env::var(name)
                .map_err(|_| CloudStackError::ConfigError(format!("{} is not set", name)))
        };
        Ok(Self::new(
            read(ENV_API_URL)?,
            read(ENV_API_KEY)?,
            read(ENV_SECRET_KEY)?,
        ))
    }

    /// Parse a YAML config document.
    pub fn from_yaml_str(yaml: &str) -> CloudStackResult<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|err| CloudStackError::ConfigError(format!("Invalid config: {}", err)))
    }

    /// Load a YAML config file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> CloudStackResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|err| {
            CloudStackError::ConfigError(format!("Failed to read {}: {}", path.display(), err))
        })?;
        Self::from_yaml_str(&contents)
    }

    /// Enable or disable waiting for async jobs.
    pub fn with_async_mode(mut self, async_mode: bool) -> Self {
        self.async_mode = async_mode;
        self
    }

    /// Set the async job timeout in seconds.
    pub fn with_async_timeout(mut self, secs: u64) -> Self {
        self.async_timeout_secs = secs;
        self
    }

    /// Only issue GET requests.
    pub fn with_http_get_only(mut self, get_only: bool) -> Self {
        self.http_get_only = get_only;
        self
    }

    /// Skip TLS verification.
    pub fn with_ssl_no_verify(mut self, no_verify: bool) -> Self {
        self.ssl_no_verify = no_verify;
        self
    }

    /// Set the per-request HTTP timeout.
    pub fn with_request_timeout(mut self, timeout_ms: u64) -> Self {
        self.request_timeout_ms = timeout_ms;
        self
    }

    /// Set the job poll policy.
    pub fn with_poll_policy(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    /// Set the default project for lookups.
    pub fn with_project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    /// Set the default zone for lookups.
    pub fn with_zone(mut self, zone_id: impl Into<String>) -> Self {
        self.zone_id = Some(zone_id.into());
        self
    }

    /// The async job timeout as a `Duration`.
    pub fn async_timeout(&self) -> Duration {
        Duration::from_secs(self.async_timeout_secs)
    }

    /// Resolve the API key from environment or config.
    pub fn resolve_api_key(&self) -> CloudStackResult<String> {
        resolve_secret("api_key", &self.api_key)
    }

    /// Resolve the secret key from environment or config.
    pub fn resolve_secret_key(&self) -> CloudStackResult<String> {
        resolve_secret("secret_key", &self.secret_key)
    }
}

fn resolve_secret(field: &str, value: &str) -> CloudStackResult<String> {
    let resolved = match value.strip_prefix('$') {
        Some(env_var) => std::env::var(env_var).map_err(|_| {
            CloudStackError::ConfigError(format!(
                "{} references ${} which is not set",
                field, env_var
            ))
        })?,
        None => value.to_string(),
    };

    if resolved.is_empty() {
        return Err(CloudStackError::ConfigError(format!("{} is empty", field)));
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::new("https://cloud.example.com/client/api", "key", "secret");
        assert!(config.async_mode);
        assert_eq!(config.async_timeout(), Duration::from_secs(300));
        assert_eq!(config.request_timeout_ms, 60000);
        assert!(!config.http_get_only);
        assert!(!config.ssl_no_verify);
        assert_eq!(config.poll, PollPolicy::default());
    }

    #[test]
    fn test_builder_methods() {
        let config = ClientConfig::new("https://cloud.example.com/client/api", "key", "secret")
            .with_async_mode(false)
            .with_async_timeout(1800)
            .with_http_get_only(true)
            .with_project("proj-1")
            .with_zone("zone-1");

        assert!(!config.async_mode);
        assert_eq!(config.async_timeout_secs, 1800);
        assert!(config.http_get_only);
        assert_eq!(config.project_id.as_deref(), Some("proj-1"));
        assert_eq!(config.zone_id.as_deref(), Some("zone-1"));
    }

    #[test]
    fn test_yaml_defaults() {
        let config = ClientConfig::from_yaml_str(
            "api_url: https://cloud.example.com/client/api\napi_key: key\nsecret_key: secret\n",
        )
        .unwrap();

        assert!(config.async_mode);
        assert_eq!(config.async_timeout_secs, 300);
        assert_eq!(config.poll, PollPolicy::default());
        assert!(config.project_id.is_none());
    }

    #[test]
    fn test_yaml_overrides() {
        let yaml = r#"
api_url: https://cloud.example.com/client/api
api_key: key
secret_key: secret
async_mode: false
async_timeout_secs: 60
http_get_only: true
poll:
  initial_delay_ms: 500
  max_delay_ms: 2000
zone_id: zone-9
"#;
        let config = ClientConfig::from_yaml_str(yaml).unwrap();

        assert!(!config.async_mode);
        assert_eq!(config.async_timeout_secs, 60);
        assert!(config.http_get_only);
        assert_eq!(config.poll.initial_delay_ms, 500);
        assert_eq!(config.poll.increment_ms, 1000);
        assert_eq!(config.poll.max_delay_ms, 2000);
        assert_eq!(config.zone_id.as_deref(), Some("zone-9"));
    }

    #[test]
    fn test_yaml_missing_credentials() {
        let err = ClientConfig::from_yaml_str("api_url: https://cloud.example.com\n").unwrap_err();
        assert!(matches!(err, CloudStackError::ConfigError(_)));
    }

    #[test]
    fn test_resolve_keys_from_env() {
        std::env::set_var("TEST_CS_CONFIG_SECRET", "s3cr3t");

        let config = ClientConfig::new("https://cloud.example.com", "plain-key", "$TEST_CS_CONFIG_SECRET");
        assert_eq!(config.resolve_api_key().unwrap(), "plain-key");
        assert_eq!(config.resolve_secret_key().unwrap(), "s3cr3t");

        std::env::remove_var("TEST_CS_CONFIG_SECRET");
    }

    #[test]
    fn test_resolve_missing_env_reference() {
        let config = ClientConfig::new("https://cloud.example.com", "$TEST_CS_CONFIG_UNSET", "s");
        let err = config.resolve_api_key().unwrap_err();
        assert!(err.to_string().contains("TEST_CS_CONFIG_UNSET"));
    }

    #[test]
    fn test_resolve_empty_key() {
        let config = ClientConfig::new("https://cloud.example.com", "key", "");
        assert!(config.resolve_secret_key().is_err());
    }
}
