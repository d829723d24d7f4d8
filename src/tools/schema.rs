//! Field constraints and the validation step that runs before every handler.
//!
//! Tool arguments arrive as a raw JSON object wrapped in [`ToolArguments`].
//! Decoding names the offending field for presence, type, enum and unknown
//! field failures; numeric ranges are checked afterwards through [`Validate`].
//! Defaults only fill absent fields, so a present but invalid value never
//! falls back to its default.
use std::{borrow::Cow, collections::BTreeMap, marker::PhantomData};

use rmcp::model::{ErrorData, JsonObject};
use schemars::{JsonSchema, Schema, SchemaGenerator};
use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::{json, Value};
use thiserror::Error;

use crate::lib::errors::INVALID_ARGUMENT_ERROR;

/// Field name reported when a failure has no narrower location.
const ROOT_FIELD: &str = "arguments";

/// The rule a field violated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Constraint {
    #[error("must be between {min} and {max} inclusive (got {actual})")]
    Range { min: f64, max: f64, actual: f64 },
    #[error("is required")]
    Required,
    #[error("has the wrong type: {detail}")]
    Type { detail: String },
    #[error("is not an allowed value: {detail}")]
    Enum { detail: String },
    #[error("is not a declared field")]
    Unknown,
}

impl Constraint {
    pub const fn code(&self) -> &'static str {
        match self {
            Constraint::Range { .. } => "range",
            Constraint::Required => "required",
            Constraint::Type { .. } => "type",
            Constraint::Enum { .. } => "enum",
            Constraint::Unknown => "unknown_field",
        }
    }
}

/// Validation failure naming the offending field.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("`{field}` {constraint}")]
pub struct ValidationError {
    pub field: String,
    pub constraint: Constraint,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, constraint: Constraint) -> Self {
        Self {
            field: field.into(),
            constraint,
        }
    }

    /// Convert into the protocol-level `invalid_params` error.
    pub fn into_error_data(self) -> ErrorData {
        INVALID_ARGUMENT_ERROR
            .builder()
            .retryable(false)
            .details(Value::String(self.to_string()))
            .with_context_field("field", json!(self.field))
            .with_context_field("constraint", json!(self.constraint.code()))
            .build()
            .unwrap_or_else(|err| ErrorData::internal_error(err.to_string(), None))
    }
}

/// Post-deserialization checks for a tool's input.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Inclusive numeric bounds for one field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericRange {
    pub field: &'static str,
    pub min: f64,
    pub max: f64,
}

impl NumericRange {
    pub const fn new(field: &'static str, min: f64, max: f64) -> Self {
        Self { field, min, max }
    }

    pub fn check(&self, actual: f64) -> Result<(), ValidationError> {
        if actual >= self.min && actual <= self.max {
            return Ok(());
        }
        Err(ValidationError::new(
            self.field,
            Constraint::Range {
                min: self.min,
                max: self.max,
                actual,
            },
        ))
    }
}

/// Undecoded tool arguments destined for `T`.
///
/// Advertises `T`'s schema, so the published input shape is that of the
/// typed request.
#[derive(Debug, Clone)]
pub struct ToolArguments<T> {
    raw: JsonObject,
    target: PhantomData<fn() -> T>,
}

impl<T> ToolArguments<T> {
    pub fn new(raw: JsonObject) -> Self {
        Self {
            raw,
            target: PhantomData,
        }
    }
}

impl<'de, T> Deserialize<'de> for ToolArguments<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        JsonObject::deserialize(deserializer).map(Self::new)
    }
}

impl<T: JsonSchema> JsonSchema for ToolArguments<T> {
    fn inline_schema() -> bool {
        T::inline_schema()
    }

    fn schema_name() -> Cow<'static, str> {
        T::schema_name()
    }

    fn schema_id() -> Cow<'static, str> {
        T::schema_id()
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        T::json_schema(generator)
    }
}

impl<T: DeserializeOwned + Validate> ToolArguments<T> {
    /// Decode into `T` and run its [`Validate`] checks.
    pub fn decode(self) -> Result<T, ValidationError> {
        let input: T = serde_path_to_error::deserialize(Value::Object(self.raw))
            .map_err(decode_failure)?;
        input.validate()?;
        Ok(input)
    }

    /// [`Self::decode`] with failures mapped to `invalid_params`.
    pub fn into_validated(self) -> Result<T, ErrorData> {
        self.decode().map_err(ValidationError::into_error_data)
    }
}

/// Classify a decode failure by serde's message, locating it by the decoded path.
///
/// Missing and unknown fields are reported at the enclosing object, so the
/// field name is taken from the message instead.
fn decode_failure(error: serde_path_to_error::Error<serde_json::Error>) -> ValidationError {
    let location = error.path().to_string();
    let message = error.inner().to_string();

    if let Some(field) = quoted_after(&message, "missing field ") {
        return ValidationError::new(nested(&location, field), Constraint::Required);
    }
    if let Some(field) = quoted_after(&message, "unknown field ") {
        return ValidationError::new(nested(&location, field), Constraint::Unknown);
    }

    let field = if location == "." {
        ROOT_FIELD.to_string()
    } else {
        location
    };
    let constraint = if message.starts_with("unknown variant ") {
        Constraint::Enum { detail: message }
    } else {
        Constraint::Type { detail: message }
    };
    ValidationError::new(field, constraint)
}

fn quoted_after<'a>(message: &'a str, prefix: &str) -> Option<&'a str> {
    message
        .strip_prefix(prefix)?
        .strip_prefix('`')?
        .split('`')
        .next()
}

fn nested(location: &str, field: &str) -> String {
    if location == "." {
        field.to_string()
    } else {
        format!("{location}.{field}")
    }
}

/// A declared string argument of a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgumentSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
}

/// Validate raw prompt arguments against `specs`.
///
/// Unknown names are rejected; every value must be a string.
pub fn string_arguments(
    specs: &[ArgumentSpec],
    raw: Option<&JsonObject>,
) -> Result<BTreeMap<&'static str, String>, ValidationError> {
    let empty = JsonObject::new();
    let raw = raw.unwrap_or(&empty);

    if let Some(unknown) = raw
        .keys()
        .find(|key| !specs.iter().any(|spec| spec.name == key.as_str()))
    {
        return Err(ValidationError::new(unknown.clone(), Constraint::Unknown));
    }

    let mut values = BTreeMap::new();
    for spec in specs {
        match raw.get(spec.name) {
            Some(Value::String(value)) => {
                values.insert(spec.name, value.clone());
            }
            Some(Value::Null) | None if !spec.required => {}
            Some(Value::Null) | None => {
                return Err(ValidationError::new(spec.name, Constraint::Required));
            }
            Some(_) => {
                return Err(ValidationError::new(
                    spec.name,
                    Constraint::Type {
                        detail: "expected a string".into(),
                    },
                ))
            }
        }
    }
    Ok(values)
}
