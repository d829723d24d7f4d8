use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::schema::{Validate, ValidationError};
use crate::{
    lib::{
        errors::ToolError,
        inference::{GeneratedImage, ImageInference, TextToImageRequest, IMAGE_INFERENCE_STEPS},
    },
    server::config::InferenceSection,
};

pub const IMAGE_TOOL_ID: &str = "generate-image";

/// Input for `generate-image`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ImageRequest {
    /// Text description of the image to generate.
    pub prompt: String,
}

impl Validate for ImageRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

/// Generate one image. Without a credential no call is attempted.
pub async fn generate_image(
    inference: &dyn ImageInference,
    settings: &InferenceSection,
    prompt: &str,
) -> Result<GeneratedImage, ToolError> {
    let token = settings
        .token
        .as_deref()
        .ok_or(ToolError::MissingCredential)?;

    inference
        .text_to_image(TextToImageRequest {
            model: settings.model.clone(),
            prompt: prompt.to_string(),
            token: token.to_string(),
            steps: IMAGE_INFERENCE_STEPS,
        })
        .await
        .map_err(ToolError::Inference)
}
