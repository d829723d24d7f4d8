use std::path::Path;

use serde::Deserialize;

use super::http::validate_url;
use crate::lib::errors::ConfigError;

pub const DEFAULT_IMAGE_MODEL: &str = "black-forest-labs/FLUX.1-schnell";
pub const DEFAULT_INFERENCE_BASE_URL: &str = "https://router.huggingface.co/hf-inference/models";

/// Image inference settings. `token` may be absent.
#[derive(Debug, Clone)]
pub struct InferenceSection {
    pub token: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl Default for InferenceSection {
    fn default() -> Self {
        Self {
            token: None,
            model: DEFAULT_IMAGE_MODEL.to_string(),
            base_url: DEFAULT_INFERENCE_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct RawInferenceSection {
    pub token: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

/// Parse `[inference]`; a blank or missing token falls back to `fallback_token`.
pub fn parse_inference_section(
    raw: Option<RawInferenceSection>,
    path: &Path,
    fallback_token: Option<String>,
) -> Result<InferenceSection, ConfigError> {
    let raw = raw.unwrap_or_default();
    let token = raw
        .token
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .or(fallback_token);

    let model = match raw.model {
        Some(value) if value.trim().is_empty() => {
            return Err(ConfigError::InvalidField {
                path: path.to_path_buf(),
                field: "inference.model",
                message: "Model identifier must not be blank".into(),
            })
        }
        Some(value) => value.trim().to_string(),
        None => DEFAULT_IMAGE_MODEL.to_string(),
    };
    let base_url = raw
        .base_url
        .unwrap_or_else(|| DEFAULT_INFERENCE_BASE_URL.to_string());
    validate_url(&base_url, "inference.base_url", path)?;

    Ok(InferenceSection {
        token,
        model,
        base_url,
    })
}
