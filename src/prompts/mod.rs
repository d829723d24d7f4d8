//! Prompt registry and the prompts served by this server.

pub mod code_review;

use std::collections::BTreeMap;

use rmcp::model::{ErrorData, GetPromptResult, JsonObject, Prompt, PromptArgument, PromptMessage};
use serde_json::json;

use crate::{
    lib::errors::{RegistryError, UNKNOWN_PROMPT_ERROR},
    tools::schema::{string_arguments, ArgumentSpec, ValidationError},
};

/// Renders validated arguments into the prompt's message sequence.
pub type PromptTemplate = fn(&BTreeMap<&'static str, String>) -> Vec<PromptMessage>;

/// A named prompt with string arguments and a pure template.
#[derive(Debug, Clone, Copy)]
pub struct PromptDefinition {
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub arguments: &'static [ArgumentSpec],
    pub template: PromptTemplate,
}

impl PromptDefinition {
    fn to_prompt(self) -> Prompt {
        let arguments = self
            .arguments
            .iter()
            .map(|spec| PromptArgument {
                name: spec.name.to_string(),
                title: None,
                description: Some(spec.description.to_string()),
                required: Some(spec.required),
            })
            .collect();
        let mut prompt = Prompt::new(self.name, Some(self.description), Some(arguments));
        prompt.title = Some(self.title.to_string());
        prompt
    }
}

/// Read-only after construction.
#[derive(Debug, Default)]
pub struct PromptRegistry {
    entries: BTreeMap<&'static str, PromptDefinition>,
}

impl PromptRegistry {
    /// Registry holding every prompt this server ships.
    pub fn with_defaults() -> Result<Self, RegistryError> {
        let mut registry = Self::default();
        registry.register(code_review::definition())?;
        Ok(registry)
    }

    /// Duplicate names are rejected.
    pub fn register(&mut self, definition: PromptDefinition) -> Result<(), RegistryError> {
        if self.entries.contains_key(definition.name) {
            return Err(RegistryError::Duplicate {
                kind: "prompt",
                name: definition.name.to_string(),
            });
        }
        self.entries.insert(definition.name, definition);
        Ok(())
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.entries.keys().copied().collect()
    }

    pub fn list(&self) -> Vec<Prompt> {
        self.entries.values().map(|def| def.to_prompt()).collect()
    }

    /// Validate `arguments` and render the named prompt.
    pub fn render(
        &self,
        name: &str,
        arguments: Option<&JsonObject>,
    ) -> Result<GetPromptResult, ErrorData> {
        let definition = self.entries.get(name).ok_or_else(|| unknown_prompt(name))?;
        let values = string_arguments(definition.arguments, arguments)
            .map_err(ValidationError::into_error_data)?;

        Ok(GetPromptResult {
            description: Some(definition.description.to_string()),
            messages: (definition.template)(&values),
        })
    }
}

fn unknown_prompt(name: &str) -> ErrorData {
    UNKNOWN_PROMPT_ERROR
        .builder()
        .retryable(false)
        .with_context_field("prompt", json!(name))
        .build()
        .unwrap_or_else(|err| ErrorData::internal_error(err.to_string(), None))
}
