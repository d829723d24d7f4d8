//! Normalizes handler results into `CallToolResult` envelopes.
use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine as _};
use rmcp::model::{CallToolResult, Content, Role};
use serde_json::json;

use crate::lib::{errors::ToolError, inference::GeneratedImage};

/// Priority annotation attached to generated images.
pub const IMAGE_PRIORITY: f32 = 0.9;

/// Single text item, mirrored verbatim into `structured_content`.
///
/// Hosts on older protocol revisions read `content`, newer ones read
/// `structured_content`; both must carry the same text.
pub fn text_envelope(text: impl Into<String>) -> CallToolResult {
    let text = text.into();
    let mut result = CallToolResult::success(vec![Content::text(text.clone())]);
    result.structured_content = Some(json!({
        "content": [{ "type": "text", "text": text }]
    }));
    result
}

/// Single base64 image item addressed to the user. No structured mirror.
pub fn image_envelope(bytes: &[u8], mime_type: &str, priority: f32) -> CallToolResult {
    let data = BASE64_STANDARD.encode(bytes);
    let content = Content::image(data, mime_type)
        .with_audience(vec![Role::User])
        .with_priority(priority);
    CallToolResult::success(vec![content])
}

/// Collapse a text handler outcome; operational errors become their message.
pub fn from_text_result(result: Result<String, ToolError>) -> CallToolResult {
    match result {
        Ok(text) => text_envelope(text),
        Err(err) => text_envelope(err.to_string()),
    }
}

/// Collapse an image handler outcome; operational errors become text.
pub fn from_image_result(result: Result<GeneratedImage, ToolError>) -> CallToolResult {
    match result {
        Ok(image) => image_envelope(&image.bytes, &image.mime_type, IMAGE_PRIORITY),
        Err(err) => text_envelope(err.to_string()),
    }
}
