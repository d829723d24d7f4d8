use std::path::PathBuf;

use config::ConfigError as ConfigLoaderError;
use rmcp::model::ErrorData;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors that can occur while loading or validating configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to build (read) the configuration file.
    #[error("Failed to read configuration file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: ConfigLoaderError,
    },
    /// Failed to deserialize TOML into a struct.
    #[error("Failed to parse configuration file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ConfigLoaderError,
    },
    /// Field failed validation.
    #[error("Configuration file {path} has invalid `{field}`: {message}")]
    InvalidField {
        path: PathBuf,
        field: &'static str,
        message: String,
    },
}

impl ConfigError {
    /// Helper to wrap `config::ConfigError` as a read failure.
    pub fn from_read_error(path: PathBuf, source: ConfigLoaderError) -> Self {
        Self::FileRead { path, source }
    }

    /// Helper to wrap `config::ConfigError` as a parse failure.
    pub fn from_parse_error(path: PathBuf, source: ConfigLoaderError) -> Self {
        Self::Parse { path, source }
    }
}

/// Failures of a single outbound HTTP or inference call.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {source}")]
    Client {
        #[source]
        source: reqwest::Error,
    },
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} responded with HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("unexpected response body from {url}: {message}")]
    Decode { url: String, message: String },
}

/// Operational failures of a tool handler.
///
/// These are never surfaced as protocol errors. The `Display` text is what
/// the caller receives inside a text envelope.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("오류: 0으로 나눌 수 없습니다.")]
    DivisionByZero,
    #[error("오류: 유효하지 않은 타임존입니다: {timezone}")]
    UnknownTimezone { timezone: String },
    #[error("'{address}'에 대한 검색 결과가 없습니다.")]
    NoGeocodeResult { address: String },
    #[error("지오코딩 요청에 실패했습니다: {0}")]
    Geocode(#[source] FetchError),
    #[error("날씨 정보를 가져오지 못했습니다: {0}")]
    Weather(#[source] FetchError),
    #[error(
        "HF_TOKEN이 설정되지 않아 이미지를 생성할 수 없습니다. [inference].token 또는 HF_TOKEN 환경 변수를 설정한 뒤 다시 시도하세요."
    )]
    MissingCredential,
    #[error("이미지 생성에 실패했습니다: {0}")]
    Inference(#[source] FetchError),
}

impl ToolError {
    /// Short machine-readable label used in logs.
    pub const fn kind(&self) -> &'static str {
        match self {
            ToolError::DivisionByZero => "division_by_zero",
            ToolError::UnknownTimezone { .. } => "unknown_timezone",
            ToolError::NoGeocodeResult { .. } => "no_geocode_result",
            ToolError::Geocode(_) => "geocode_failed",
            ToolError::Weather(_) => "weather_failed",
            ToolError::MissingCredential => "missing_credential",
            ToolError::Inference(_) => "inference_failed",
        }
    }
}

/// Programmer errors raised while populating a registry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("{kind} `{name}` is already registered")]
    Duplicate { kind: &'static str, name: String },
}

/// Failures while assembling the server facade.
#[derive(Debug, Error)]
pub enum ServerSetupError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Client(#[from] FetchError),
}

/// Structured error metadata returned by MCP tools.
#[derive(Debug, Clone, Serialize)]
pub struct ToolErrorDescriptor {
    /// Error code.
    pub code: &'static str,
    /// User-facing message.
    pub message: &'static str,
    /// Recommended remediation.
    pub remediation: &'static str,
}

impl ToolErrorDescriptor {
    /// Simple constructor.
    pub const fn new(code: &'static str, message: &'static str, remediation: &'static str) -> Self {
        Self {
            code,
            message,
            remediation,
        }
    }

    /// Create a builder.
    pub fn builder(&self) -> ToolErrorDescriptorBuilder<'_> {
        ToolErrorDescriptorBuilder::new(self)
    }
}

/// Builder for error data that fails if required fields are missing.
pub struct ToolErrorDescriptorBuilder<'a> {
    descriptor: &'a ToolErrorDescriptor,
    retryable: Option<bool>,
    details: Option<Value>,
    extra_fields: Map<String, Value>,
}

impl<'a> ToolErrorDescriptorBuilder<'a> {
    pub fn new(descriptor: &'a ToolErrorDescriptor) -> Self {
        Self {
            descriptor,
            retryable: None,
            details: None,
            extra_fields: Map::new(),
        }
    }

    pub fn retryable(mut self, retryable: bool) -> Self {
        self.retryable = Some(retryable);
        self
    }

    pub fn details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn with_context_field(mut self, key: &str, value: Value) -> Self {
        self.extra_fields.insert(key.to_string(), value);
        self
    }

    pub fn build(self) -> Result<ErrorData, ToolErrorBuilderError> {
        if self.descriptor.remediation.trim().is_empty() {
            return Err(ToolErrorBuilderError::MissingRemediation {
                code: self.descriptor.code,
            });
        }
        let retryable = self
            .retryable
            .ok_or(ToolErrorBuilderError::MissingRetryable {
                code: self.descriptor.code,
            })?;

        let mut data = Map::new();
        data.insert("code".into(), Value::String(self.descriptor.code.into()));
        data.insert(
            "remediation".into(),
            Value::String(self.descriptor.remediation.into()),
        );
        data.insert("retryable".into(), Value::Bool(retryable));
        if let Some(details) = self.details {
            data.insert("details".into(), details);
        }
        for (key, value) in self.extra_fields {
            data.insert(key, value);
        }

        Ok(ErrorData::invalid_params(
            self.descriptor.message,
            Some(Value::Object(data)),
        ))
    }
}

/// Errors when required builder fields are missing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ToolErrorBuilderError {
    #[error("retryable is missing (code={code})")]
    MissingRetryable { code: &'static str },
    #[error("remediation is empty (code={code})")]
    MissingRemediation { code: &'static str },
}

/// Arguments violated a declared field constraint.
pub const INVALID_ARGUMENT_ERROR: ToolErrorDescriptor = ToolErrorDescriptor::new(
    "INVALID_ARGUMENT",
    "Arguments do not satisfy the declared input schema",
    "Fix the field named in `field` so it satisfies `constraint`, then retry.",
);

/// Requested prompt name is not registered.
pub const UNKNOWN_PROMPT_ERROR: ToolErrorDescriptor = ToolErrorDescriptor::new(
    "UNKNOWN_PROMPT",
    "No prompt is registered under this name",
    "Call prompts/list and use one of the advertised prompt names.",
);
