use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::schema::{Validate, ValidationError};
use crate::lib::errors::ToolError;

pub const TIME_TOOL_ID: &str = "get-time";

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S (%Z)";

/// Input for `get-time`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct TimeRequest {
    /// IANA timezone name such as `Asia/Seoul` or `America/New_York`.
    pub timezone: String,
}

impl Validate for TimeRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

/// Format `now` in `timezone` using a 24-hour clock.
///
/// Zone names match case-insensitively; the caller's spelling is echoed back.
pub fn format_in_timezone(timezone: &str, now: DateTime<Utc>) -> Result<String, ToolError> {
    let tz = Tz::from_str_insensitive(timezone).map_err(|_| ToolError::UnknownTimezone {
        timezone: timezone.to_string(),
    })?;
    let local = now.with_timezone(&tz);
    Ok(format!(
        "{timezone}의 현재 시간: {}",
        local.format(TIME_FORMAT)
    ))
}
