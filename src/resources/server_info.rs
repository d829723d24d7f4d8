use std::{sync::Arc, time::Instant};

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use super::ResourceDefinition;
use crate::{
    server::runtime::{SERVER_NAME, SERVER_VERSION},
    tools::{ToolSummary, TOOL_CATALOG},
};

pub const SERVER_INFO_URI: &str = "server://info";
pub const SERVER_INFO_RESOURCE_ID: &str = "server-info";

/// JSON body of `server://info`.
#[derive(Debug, Clone, Serialize)]
pub struct ServerInfoSnapshot {
    pub name: &'static str,
    pub version: &'static str,
    pub timestamp: String,
    pub uptime_seconds: f64,
    pub tools: &'static [ToolSummary],
}

pub fn snapshot(started_at: Instant) -> ServerInfoSnapshot {
    ServerInfoSnapshot {
        name: SERVER_NAME,
        version: SERVER_VERSION,
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        uptime_seconds: started_at.elapsed().as_secs_f64(),
        tools: TOOL_CATALOG,
    }
}

pub fn definition(started_at: Instant) -> ResourceDefinition {
    ResourceDefinition {
        name: SERVER_INFO_RESOURCE_ID,
        uri: SERVER_INFO_URI,
        title: "Server Info",
        description: "Server identity, uptime and tool catalog",
        mime_type: "application/json",
        supplier: Arc::new(move || serde_json::to_string_pretty(&snapshot(started_at))),
    }
}
