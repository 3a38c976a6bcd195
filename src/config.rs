use std::env;
use std::path::PathBuf;
use std::sync::OnceLock;
use thiserror::Error;

/// Port used when `SERVER_PORT` is not set.
pub const DEFAULT_SERVER_PORT: u16 = 8080;
/// Generation service used when `OLLAMA_URL` is not set.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
/// Model used when `SUMMARY_MODEL` is not set.
pub const DEFAULT_SUMMARY_MODEL: &str = "llama3.2";

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the roster server.
#[derive(Debug)]
pub struct Config {
    /// TCP port the HTTP server listens on.
    pub server_port: u16,
    /// Base URL of the Ollama runtime that generates summaries.
    pub ollama_url: String,
    /// Model identifier sent with every generation request.
    pub summary_model: String,
    /// Optional file that receives a copy of the log output.
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults for unset keys.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            server_port: load_env_optional("SERVER_PORT")
                .map(|value| {
                    value
                        .trim()
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".into()))
                })
                .transpose()?
                .unwrap_or(DEFAULT_SERVER_PORT),
            ollama_url: load_env_optional("OLLAMA_URL")
                .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string()),
            summary_model: load_env_optional("SUMMARY_MODEL")
                .unwrap_or_else(|| DEFAULT_SUMMARY_MODEL.to_string()),
            log_file: load_env_optional("LOG_FILE").map(PathBuf::from),
        })
    }
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Retrieve the loaded configuration, panicking if initialization has not occurred.
pub fn get_config() -> &'static Config {
    CONFIG.get().expect("Config not initialized")
}

/// Load configuration from the environment and install it in the global cache.
pub fn init_config() -> Result<&'static Config, ConfigError> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    Ok(CONFIG.get_or_init(|| config))
}
