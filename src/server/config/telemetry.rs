use tracing::{debug, info};

use super::{ServerConfig, CONFIG_ENV_KEY, DEFAULT_CONFIG_PATH};

pub fn log_env_source(path: &std::path::Path, from_env: bool) {
    if from_env {
        info!(
            target: "toolbox_mcp::config",
            path = %path.display(),
            "Loading configuration using TOOLBOX_CONFIG_PATH environment variable"
        );
    } else {
        debug!(
            target: "toolbox_mcp::config",
            path = %path.display(),
            env = CONFIG_ENV_KEY,
            default = DEFAULT_CONFIG_PATH,
            "TOOLBOX_CONFIG_PATH not set; using default config.toml"
        );
    }
}

pub fn log_defaults(path: &std::path::Path) {
    info!(
        target: "toolbox_mcp::config",
        path = %path.display(),
        "No configuration file found; using built-in defaults"
    );
}

pub fn log_loaded(config: &ServerConfig) {
    info!(
        target: "toolbox_mcp::config",
        path = %config.source_label(),
        host = %config.server.host,
        port = config.server.port,
        geocode_url = %config.http.geocode_url,
        weather_url = %config.http.weather_url,
        image_model = %config.inference.model,
        credential_configured = config.inference.token.is_some(),
        "Configuration file loaded successfully"
    );
}
