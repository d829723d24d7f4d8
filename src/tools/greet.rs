use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::schema::{Validate, ValidationError};

pub const GREET_TOOL_ID: &str = "greet";

/// Greeting language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Ko,
    #[default]
    En,
}

/// Input for `greet`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct GreetRequest {
    /// Name of the person to greet.
    pub name: String,
    /// Greeting language (`ko` or `en`, defaults to `en`).
    #[serde(default)]
    pub language: Language,
}

impl Validate for GreetRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

pub fn greet(request: &GreetRequest) -> String {
    match request.language {
        Language::Ko => format!("안녕하세요, {}님!", request.name),
        Language::En => format!("Hello, {}!", request.name),
    }
}
