use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use thiserror::Error;
use validator::Validate;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("Parse error for {field}: {value} - {source}")]
    Parse {
        field: String,
        value: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Information returned by `GET /help/info`
#[derive(Clone, Debug, PartialEq, Validate, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HelpInfo {
    #[validate(length(min = 1, message = "Component name cannot be empty"))]
    pub name: String,
    pub api_version: String,
    pub software_version: String,
    pub vendor: String,
    pub license: String,
}

impl Default for HelpInfo {
    fn default() -> Self {
        Self {
            name: "wenet/profile-manager".to_string(),
            api_version: env!("CARGO_PKG_VERSION").to_string(),
            software_version: env!("CARGO_PKG_VERSION").to_string(),
            vendor: "UDT-IA, IIIA-CSIC".to_string(),
            license: "MIT".to_string(),
        }
    }
}

/// Server configuration with validation
#[derive(Clone, Debug, Validate, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// HTTP server host address
    #[validate(length(min = 1, message = "HTTP host cannot be empty"))]
    pub http_host: String,

    /// HTTP server port (1-65535)
    #[validate(range(
        min = 1,
        max = 65535,
        message = "HTTP port must be between 1 and 65535"
    ))]
    pub http_port: u16,

    /// Profiles loaded into the store on startup
    pub seed_file: Option<PathBuf>,

    /// Page size used when a listing request gives no `limit`
    #[validate(range(
        min = 1,
        max = 1000,
        message = "Default page limit must be between 1 and 1000"
    ))]
    pub default_page_limit: usize,

    /// Seconds before a request is aborted
    #[validate(range(
        min = 1,
        max = 600,
        message = "Request timeout must be between 1 and 600 seconds"
    ))]
    pub request_timeout_secs: u64,

    /// Largest accepted request body
    #[validate(range(min = 1, message = "Max body size must be positive"))]
    pub max_body_bytes: usize,

    /// Whether to run server in daemon mode
    pub daemon: bool,

    #[validate(nested)]
    pub help_info: HelpInfo,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_host: "0.0.0.0".to_string(),
            http_port: 8080,
            seed_file: None,
            default_page_limit: 10,
            request_timeout_secs: 30,
            max_body_bytes: 1024 * 1024,
            daemon: false,
            help_info: HelpInfo::default(),
        }
    }
}

impl ServerConfig {
    /// Create configuration from environment variables with validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            http_host: read_env_var("PROFILE_MANAGER_HOST")?
                .unwrap_or_else(|| "0.0.0.0".to_string()),
            http_port: parse_env_var("PROFILE_MANAGER_PORT", "8080")?,
            seed_file: read_env_var("PROFILE_MANAGER_SEED_FILE")?
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from),
            default_page_limit: parse_env_var("PROFILE_MANAGER_DEFAULT_LIMIT", "10")?,
            request_timeout_secs: parse_env_var("PROFILE_MANAGER_REQUEST_TIMEOUT", "30")?,
            max_body_bytes: parse_env_var("PROFILE_MANAGER_MAX_BODY_BYTES", "1048576")?,
            daemon: false, // Environment-based config always runs in foreground
            help_info: HelpInfo::default(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Apply the command line on top of this configuration (CLI wins)
    pub fn with_cli(mut self, cli: CliConfig) -> Result<Self, ConfigError> {
        if let Some(host) = cli.http_host {
            self.http_host = host;
        }
        if let Some(port) = cli.http_port {
            self.http_port = port;
        }
        if let Some(seed_file) = cli.seed_file {
            self.seed_file = Some(seed_file);
        }
        if let Some(limit) = cli.default_page_limit {
            self.default_page_limit = limit;
        }
        if let Some(timeout) = cli.request_timeout_secs {
            self.request_timeout_secs = timeout;
        }
        self.daemon = self.daemon || cli.daemon;

        self.validate()?;
        Ok(self)
    }

    /// Create configuration from YAML file
    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Parse {
            field: "yaml_file".to_string(),
            value: "file read failed".to_string(),
            source: Box::new(e),
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            field: "yaml_content".to_string(),
            value: content,
            source: Box::new(e),
        })?;

        config.validate()?;
        Ok(config)
    }
}

/// CLI configuration (parsed from command line arguments)
#[derive(Clone, Debug, Default)]
pub struct CliConfig {
    pub http_host: Option<String>,
    pub http_port: Option<u16>,
    pub seed_file: Option<PathBuf>,
    pub default_page_limit: Option<usize>,
    pub request_timeout_secs: Option<u64>,
    pub daemon: bool,
}

/// Parse an environment variable with a default value
/// Value of `key`, or `None` when it is not set.
fn read_env_var(key: &str) -> Result<Option<String>, ConfigError> {
    match env::var(key) {
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn parse_env_var<T: std::str::FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = read_env_var(key)?.unwrap_or_else(|| default.to_string());
    value.parse().map_err(|e| ConfigError::Parse {
        field: key.to_string(),
        value,
        source: Box::new(e),
    })
}
