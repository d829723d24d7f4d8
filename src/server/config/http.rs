use std::path::Path;

use reqwest::Url;
use serde::Deserialize;

use crate::lib::errors::ConfigError;

pub const DEFAULT_GEOCODE_URL: &str = "https://nominatim.openstreetmap.org/search";
pub const DEFAULT_WEATHER_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Outbound HTTP endpoints and the identifying header sent to the geocoder.
#[derive(Debug, Clone)]
pub struct HttpSection {
    pub user_agent: String,
    pub geocode_url: String,
    pub weather_url: String,
}

impl Default for HttpSection {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            geocode_url: DEFAULT_GEOCODE_URL.to_string(),
            weather_url: DEFAULT_WEATHER_URL.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct RawHttpSection {
    pub user_agent: Option<String>,
    pub geocode_url: Option<String>,
    pub weather_url: Option<String>,
}

pub fn default_user_agent() -> String {
    format!("toolbox-mcp/{}", env!("CARGO_PKG_VERSION"))
}

pub fn parse_http_section(
    raw: Option<RawHttpSection>,
    path: &Path,
) -> Result<HttpSection, ConfigError> {
    let raw = raw.unwrap_or_default();

    let user_agent = match raw.user_agent {
        Some(value) if value.trim().is_empty() => {
            return Err(ConfigError::InvalidField {
                path: path.to_path_buf(),
                field: "http.user_agent",
                message: "User agent must not be blank".into(),
            })
        }
        Some(value) => value.trim().to_string(),
        None => default_user_agent(),
    };
    let geocode_url = raw
        .geocode_url
        .unwrap_or_else(|| DEFAULT_GEOCODE_URL.to_string());
    validate_url(&geocode_url, "http.geocode_url", path)?;
    let weather_url = raw
        .weather_url
        .unwrap_or_else(|| DEFAULT_WEATHER_URL.to_string());
    validate_url(&weather_url, "http.weather_url", path)?;

    Ok(HttpSection {
        user_agent,
        geocode_url,
        weather_url,
    })
}

pub(crate) fn validate_url(
    url: &str,
    field: &'static str,
    path: &Path,
) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidField {
        path: path.to_path_buf(),
        field,
        message: format!("`{url}` must be an absolute http(s) URL: {reason}"),
    };

    let parsed = Url::parse(url).map_err(|err| invalid(err.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme `{}`", parsed.scheme())));
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(invalid("missing host".into()));
    }
    Ok(())
}
