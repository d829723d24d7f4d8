use std::{sync::OnceLock, time::Instant};

use crate::{cli::LaunchProfile, server::config::ServerConfig};

/// Identity advertised during the MCP handshake.
pub const SERVER_NAME: &str = "toolbox-mcp";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

static STARTED_AT: OnceLock<Instant> = OnceLock::new();

/// Instant the process first asked for its start time.
pub fn process_started_at() -> Instant {
    *STARTED_AT.get_or_init(Instant::now)
}

/// Build the `ServerInfo.instructions` string shown to MCP clients.
///
/// Reports whether an inference credential is present, never its value.
pub fn build_instructions(profile: &LaunchProfile, config: &ServerConfig) -> String {
    let credential = if config.inference.token.is_some() {
        "generate-image is available."
    } else {
        "generate-image is disabled until HF_TOKEN or [inference].token is set."
    };
    format!(
        "Loaded config {path}; waiting in {transport} mode (host={host}, port={port}). {credential}",
        path = config.source_label(),
        transport = profile.transport.as_str(),
        host = config.server.host,
        port = config.server.port,
    )
}
