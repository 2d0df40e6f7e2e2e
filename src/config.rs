use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,

    /// Incident table API configuration
    pub table_api: TableApiConfig,

    /// Language model configuration
    pub model: ModelConfig,

    /// Enrichment pipeline configuration
    #[serde(default)]
    pub enrichment: EnrichmentConfig,

    /// Observability configuration
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path =
            std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config/default.toml".to_string());

        config::Config::builder()
            // Start with default values
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            // Override with config file if it exists
            .add_source(config::File::with_name(&config_path).required(false))
            // Override with environment variables (prefix: INCIDENT_INTEL)
            .add_source(
                config::Environment::with_prefix("INCIDENT_INTEL")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_http_port")]
    pub http_port: u16,

    /// Request timeout (seconds)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

/// Connection settings for the incident table REST API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableApiConfig {
    /// Instance base URL, e.g. https://acme.service-now.com
    pub base_url: String,

    /// Basic-auth username
    pub username: String,

    /// Name of the environment variable holding the password
    #[serde(default = "default_password_env")]
    pub password_env: String,

    /// Per-request timeout (seconds)
    #[serde(default = "default_table_api_timeout")]
    pub request_timeout_secs: u64,
}

/// Settings for the language-model provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// OpenAI-compatible API base URL
    #[serde(default = "default_model_base_url")]
    pub base_url: String,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Name of the environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Completion token budget
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Per-request timeout (seconds)
    #[serde(default = "default_model_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentConfig {
    /// Wall-clock budget for one enrichment run (seconds)
    #[serde(default = "default_deadline")]
    pub deadline_secs: u64,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            deadline_secs: default_deadline(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub json_logs: bool,

    /// Service name
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_http_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    30
}

fn default_password_env() -> String {
    "SNOW_PASSWORD".to_string()
}

fn default_table_api_timeout() -> u64 {
    10
}

fn default_model_base_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_model() -> String {
    "llama-3.1-8b-instant".to_string()
}

fn default_api_key_env() -> String {
    "GROQ_API_KEY".to_string()
}

fn default_temperature() -> f32 {
    0.5
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_model_timeout() -> u64 {
    30
}

fn default_deadline() -> u64 {
    60
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_service_name() -> String {
    "incident-intel".to_string()
}
