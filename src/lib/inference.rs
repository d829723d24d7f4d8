//! Text-to-image inference primitive.

use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client};
use serde_json::json;
use tracing::debug;

use crate::lib::errors::FetchError;

/// Fixed denoising step count sent with every request.
pub const IMAGE_INFERENCE_STEPS: u32 = 5;

const FALLBACK_IMAGE_MIME: &str = "image/png";

/// Input for one text-to-image call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextToImageRequest {
    pub model: String,
    pub prompt: String,
    pub token: String,
    pub steps: u32,
}

/// Raw image bytes returned by the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

#[async_trait]
pub trait ImageInference: Send + Sync {
    async fn text_to_image(&self, request: TextToImageRequest)
        -> Result<GeneratedImage, FetchError>;
}

/// `ImageInference` backed by a Hugging Face style inference endpoint.
#[derive(Debug, Clone)]
pub struct HfInferenceClient {
    client: Client,
    base_url: String,
}

impl HfInferenceClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, FetchError> {
        let client = Client::builder()
            .build()
            .map_err(|source| FetchError::Client { source })?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn model_url(&self, model: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), model)
    }
}

#[async_trait]
impl ImageInference for HfInferenceClient {
    async fn text_to_image(
        &self,
        request: TextToImageRequest,
    ) -> Result<GeneratedImage, FetchError> {
        let url = self.model_url(&request.model);
        debug!(target: "toolbox_mcp::http", url = %url, steps = request.steps, "Requesting image");

        let body = json!({
            "inputs": request.prompt,
            "parameters": { "num_inference_steps": request.steps },
        });
        let response = self
            .client
            .post(&url)
            .bearer_auth(&request.token)
            .header("Accept", "image/png")
            .json(&body)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url,
                status: status.as_u16(),
            });
        }

        // A missing Content-Type is assumed to be PNG; anything declared
        // non-image (typically a JSON error body) is rejected.
        let declared = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.split(';').next().unwrap_or(value).trim().to_string());
        let mime_type = match declared {
            None => FALLBACK_IMAGE_MIME.to_string(),
            Some(value) if value.starts_with("image/") => value,
            Some(value) => {
                return Err(FetchError::Decode {
                    url,
                    message: format!("expected an image but received `{value}`"),
                })
            }
        };

        let bytes = response
            .bytes()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.clone(),
                source,
            })?;
        if bytes.is_empty() {
            return Err(FetchError::Decode {
                url,
                message: "empty image body".into(),
            });
        }

        Ok(GeneratedImage {
            bytes: bytes.to_vec(),
            mime_type,
        })
    }
}
