use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;
use crate::config::guard::validate_values;

/// Config file looked up when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "zephyr-harness.yaml";

// ============================================================================
// Raw config (YAML / environment)
// ============================================================================

/// Connection and target parameters as read from YAML or the environment.
///
/// Every field may be absent here. [`Settings::from_config`] turns this into
/// the validated form used by the client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZephyrConfig {
    /// Base URL of the test-result REST API (basic auth)
    pub service_url: Option<String>,

    /// Base URL of the Zephyr API that lists environments (bearer auth)
    pub zephyr_url: Option<String>,

    /// Base URL of the Jira instance used for account lookup
    pub jira_url: Option<String>,

    pub folder_name: Option<String>,
    pub zephyr_api_token: Option<String>,

    /// Pre-encoded basic credentials for Jira
    pub jira_api_token: Option<String>,

    /// Environment name, as shown by `log_environment_names`
    pub environment: Option<String>,
    pub project_key: Option<String>,
    pub project_id: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub environment_id: Option<u64>,

    /// Account the created test runs are assigned to
    pub assigned_user_id: Option<String>,
    pub jira_display_name: Option<String>,
    pub default_jira_display_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_codes: Option<StatusCodes>,

    /// JSONL lifecycle trace destination; tracing is off when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_file: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// Remote status identifiers for a finished test result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCodes {
    #[serde(default = "default_passed")]
    pub passed: u64,

    #[serde(default = "default_failed")]
    pub failed: u64,
}

impl Default for StatusCodes {
    fn default() -> Self {
        Self {
            passed: default_passed(),
            failed: default_failed(),
        }
    }
}

fn default_passed() -> u64 {
    10166
}

fn default_failed() -> u64 {
    10167
}

impl ZephyrConfig {
    /// Read `ZEPHYR_*` and `JIRA_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let environment_id = match lookup("ZEPHYR_ENVIRONMENT_ID") {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|e| ConfigError::InvalidEnv {
                name: "ZEPHYR_ENVIRONMENT_ID",
                reason: e.to_string(),
            })?),
            None => None,
        };
        let timeout_secs = match lookup("ZEPHYR_TIMEOUT_SECS") {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|e| ConfigError::InvalidEnv {
                name: "ZEPHYR_TIMEOUT_SECS",
                reason: e.to_string(),
            })?),
            None => None,
        };

        Ok(Self {
            service_url: lookup("ZEPHYR_SERVICE_URL"),
            zephyr_url: lookup("ZEPHYR_URL"),
            jira_url: lookup("JIRA_URL"),
            folder_name: lookup("ZEPHYR_FOLDER_NAME"),
            zephyr_api_token: lookup("ZEPHYR_API_TOKEN"),
            jira_api_token: lookup("JIRA_API_TOKEN"),
            environment: lookup("ZEPHYR_ENVIRONMENT"),
            project_key: lookup("ZEPHYR_PROJECT_KEY"),
            project_id: lookup("ZEPHYR_PROJECT_ID"),
            username: lookup("ZEPHYR_USERNAME"),
            password: lookup("ZEPHYR_PASSWORD"),
            environment_id,
            assigned_user_id: lookup("ZEPHYR_ASSIGNED_USER_ID"),
            jira_display_name: lookup("JIRA_DISPLAY_NAME"),
            default_jira_display_name: lookup("JIRA_DEFAULT_DISPLAY_NAME"),
            status_codes: None,
            trace_file: lookup("ZEPHYR_TRACE_FILE"),
            timeout_secs,
        })
    }

    /// Overlay every field set in `other` on top of `self`.
    pub fn merge(self, other: ZephyrConfig) -> Self {
        Self {
            service_url: other.service_url.or(self.service_url),
            zephyr_url: other.zephyr_url.or(self.zephyr_url),
            jira_url: other.jira_url.or(self.jira_url),
            folder_name: other.folder_name.or(self.folder_name),
            zephyr_api_token: other.zephyr_api_token.or(self.zephyr_api_token),
            jira_api_token: other.jira_api_token.or(self.jira_api_token),
            environment: other.environment.or(self.environment),
            project_key: other.project_key.or(self.project_key),
            project_id: other.project_id.or(self.project_id),
            username: other.username.or(self.username),
            password: other.password.or(self.password),
            environment_id: other.environment_id.or(self.environment_id),
            assigned_user_id: other.assigned_user_id.or(self.assigned_user_id),
            jira_display_name: other.jira_display_name.or(self.jira_display_name),
            default_jira_display_name: other
                .default_jira_display_name
                .or(self.default_jira_display_name),
            status_codes: other.status_codes.or(self.status_codes),
            trace_file: other.trace_file.or(self.trace_file),
            timeout_secs: other.timeout_secs.or(self.timeout_secs),
        }
    }
}

// ============================================================================
// Validated settings
// ============================================================================

/// Validated, immutable configuration shared by the client for a whole run.
#[derive(Clone, PartialEq)]
pub struct Settings {
    pub service_url: String,
    pub zephyr_url: String,
    pub jira_url: String,
    pub folder_name: String,
    pub zephyr_api_token: String,
    pub jira_api_token: String,
    pub environment: String,
    pub project_key: String,
    pub project_id: String,
    pub username: String,
    pub password: String,
    pub environment_id: u64,
    pub assigned_user_id: String,
    pub jira_display_name: String,
    pub default_jira_display_name: String,
    pub status_codes: StatusCodes,
    pub trace_file: Option<String>,
    pub timeout: Option<Duration>,
}

impl Settings {
    /// Validate a raw config. Every connection field is mandatory.
    pub fn from_config(config: ZephyrConfig) -> Result<Self, ConfigError> {
        validate_values(
            "init",
            &[
                ("service_url", config.service_url.is_some()),
                ("zephyr_url", config.zephyr_url.is_some()),
                ("jira_url", config.jira_url.is_some()),
                ("folder_name", config.folder_name.is_some()),
                ("zephyr_api_token", config.zephyr_api_token.is_some()),
                ("jira_api_token", config.jira_api_token.is_some()),
                ("environment", config.environment.is_some()),
                ("project_key", config.project_key.is_some()),
                ("project_id", config.project_id.is_some()),
                ("username", config.username.is_some()),
                ("password", config.password.is_some()),
                ("environment_id", config.environment_id.is_some()),
                ("assigned_user_id", config.assigned_user_id.is_some()),
                ("jira_display_name", config.jira_display_name.is_some()),
                ("default_jira_display_name", config.default_jira_display_name.is_some()),
            ],
        )?;

        // Presence is guaranteed by the guard above.
        Ok(Self {
            service_url: trim_base(config.service_url.unwrap_or_default()),
            zephyr_url: trim_base(config.zephyr_url.unwrap_or_default()),
            jira_url: trim_base(config.jira_url.unwrap_or_default()),
            folder_name: config.folder_name.unwrap_or_default(),
            zephyr_api_token: config.zephyr_api_token.unwrap_or_default(),
            jira_api_token: config.jira_api_token.unwrap_or_default(),
            environment: config.environment.unwrap_or_default(),
            project_key: config.project_key.unwrap_or_default(),
            project_id: config.project_id.unwrap_or_default(),
            username: config.username.unwrap_or_default(),
            password: config.password.unwrap_or_default(),
            environment_id: config.environment_id.unwrap_or_default(),
            assigned_user_id: config.assigned_user_id.unwrap_or_default(),
            jira_display_name: config.jira_display_name.unwrap_or_default(),
            default_jira_display_name: config.default_jira_display_name.unwrap_or_default(),
            status_codes: config.status_codes.unwrap_or_default(),
            trace_file: config.trace_file,
            timeout: config.timeout_secs.map(Duration::from_secs),
        })
    }
}

// Secrets stay out of logs.
impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("service_url", &self.service_url)
            .field("zephyr_url", &self.zephyr_url)
            .field("jira_url", &self.jira_url)
            .field("folder_name", &self.folder_name)
            .field("zephyr_api_token", &"<redacted>")
            .field("jira_api_token", &"<redacted>")
            .field("environment", &self.environment)
            .field("project_key", &self.project_key)
            .field("project_id", &self.project_id)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("environment_id", &self.environment_id)
            .field("assigned_user_id", &self.assigned_user_id)
            .field("jira_display_name", &self.jira_display_name)
            .field("default_jira_display_name", &self.default_jira_display_name)
            .field("status_codes", &self.status_codes)
            .field("trace_file", &self.trace_file)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

// ============================================================================
// Loading
// ============================================================================

/// Load a YAML config file.
pub fn load_config(path: &str) -> Result<ZephyrConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_string(),
        source,
    })?;
    serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_string(),
        source,
    })
}

/// Resolve settings: config file, then environment on top, then validate.
///
/// With no explicit path, `zephyr-harness.yaml` is used if it exists.
pub fn load_settings(path: Option<&str>) -> Result<Settings, ConfigError> {
    let file_config = match path {
        Some(p) => load_config(p)?,
        None if std::path::Path::new(DEFAULT_CONFIG_FILE).exists() => {
            load_config(DEFAULT_CONFIG_FILE)?
        }
        None => ZephyrConfig::default(),
    };
    let config = file_config.merge(ZephyrConfig::from_env()?);
    tracing::info!(
        project_key = config.project_key.as_deref().unwrap_or(""),
        environment = config.environment.as_deref().unwrap_or(""),
        "resolved zephyr configuration"
    );
    Settings::from_config(config)
}
