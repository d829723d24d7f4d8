//! Load and validate server configuration.
use std::{
    env,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use tracing::{error, info};

use crate::lib::errors::ConfigError;

pub mod http;
pub mod inference;
pub mod server;
pub mod telemetry;

pub use http::{
    parse_http_section, HttpSection, RawHttpSection, DEFAULT_GEOCODE_URL, DEFAULT_WEATHER_URL,
};
pub use inference::{
    parse_inference_section, InferenceSection, RawInferenceSection, DEFAULT_INFERENCE_BASE_URL,
    DEFAULT_IMAGE_MODEL,
};
pub use server::{parse_server_section, RawServerSection, ServerSection, DEFAULT_HOST, DEFAULT_PORT};

pub(crate) const CONFIG_ENV_KEY: &str = "TOOLBOX_CONFIG_PATH";
pub(crate) const DEFAULT_CONFIG_PATH: &str = "config.toml";
/// Process-wide fallback for `[inference].token`.
pub const CREDENTIAL_ENV_KEY: &str = "HF_TOKEN";

/// Top-level configuration container.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
    pub server: ServerSection,
    pub http: HttpSection,
    pub inference: InferenceSection,
    /// `None` when running on built-in defaults.
    pub source_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct RawServerConfig {
    server: Option<RawServerSection>,
    http: Option<RawHttpSection>,
    inference: Option<RawInferenceSection>,
}

impl ServerConfig {
    /// Prefer `TOOLBOX_CONFIG_PATH` if set; otherwise read `config.toml` when it exists.
    pub fn load_from_env_or_default() -> Result<Self, ConfigError> {
        match env::var(CONFIG_ENV_KEY) {
            Ok(value) if !value.trim().is_empty() => {
                let path = PathBuf::from(value);
                telemetry::log_env_source(&path, true);
                Self::load_from_path(path)
            }
            _ => Self::load_optional(Path::new(DEFAULT_CONFIG_PATH)),
        }
    }

    /// Load `path` if it exists, falling back to built-in defaults.
    pub fn load_optional(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            telemetry::log_env_source(path, false);
            return Self::load_from_path(path.to_path_buf());
        }
        telemetry::log_defaults(path);
        let mut config = Self::default();
        config.inference.token = env_credential();
        Ok(config)
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: PathBuf) -> Result<Self, ConfigError> {
        info!(
            target: "toolbox_mcp::config",
            path = %path.display(),
            "Starting configuration load"
        );

        let builder = config::Config::builder().add_source(config::File::from(path.clone()));
        let document = builder.build().map_err(|err| {
            let error = ConfigError::from_read_error(path.clone(), err);
            error!(
                target: "toolbox_mcp::config",
                path = %path.display(),
                reason = %error,
                "Failed to read configuration file"
            );
            error
        })?;

        let raw: RawServerConfig = document.try_deserialize().map_err(|err| {
            let error = ConfigError::from_parse_error(path.clone(), err);
            error!(
                target: "toolbox_mcp::config",
                path = %path.display(),
                reason = %error,
                "Failed to parse configuration file"
            );
            error
        })?;

        let config = Self::from_raw(raw, path.clone(), env_credential()).map_err(|err| {
            error!(
                target: "toolbox_mcp::config",
                path = %path.display(),
                reason = %err,
                "Failed to validate configuration file"
            );
            err
        })?;

        telemetry::log_loaded(&config);
        Ok(config)
    }

    /// Replace the credential when an explicit override is provided.
    pub fn with_credential_override(mut self, token: Option<String>) -> Self {
        if let Some(token) = token.filter(|value| !value.trim().is_empty()) {
            self.inference.token = Some(token.trim().to_string());
        }
        self
    }

    /// Human-readable origin of this configuration.
    pub fn source_label(&self) -> String {
        match &self.source_path {
            Some(path) => path.display().to_string(),
            None => "<built-in defaults>".to_string(),
        }
    }

    fn from_raw(
        raw: RawServerConfig,
        path: PathBuf,
        fallback_token: Option<String>,
    ) -> Result<Self, ConfigError> {
        let server = parse_server_section(raw.server, &path)?;
        let http = parse_http_section(raw.http, &path)?;
        let inference = parse_inference_section(raw.inference, &path, fallback_token)?;

        Ok(Self {
            server,
            http,
            inference,
            source_path: Some(path),
        })
    }
}

fn env_credential() -> Option<String> {
    env::var(CREDENTIAL_ENV_KEY)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
