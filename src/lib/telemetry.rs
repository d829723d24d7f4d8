//! Telemetry initialization and per-invocation span helpers.

use std::time::Instant;

use anyhow::Result;
use serde::Serialize;
use tracing::{info, info_span, warn, Span};
use tracing_subscriber::{fmt, EnvFilter};

use crate::lib::errors::ToolError;

/// Initialize `tracing` and format developer logs.
pub fn init_tracing() -> Result<()> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to initialize tracing: {err}"))
}

/// Span helper recording the start and outcome of one tool invocation.
pub struct InvocationSpan {
    span: Span,
    started_at: Instant,
    tool: &'static str,
}

impl InvocationSpan {
    /// Start a span for `tool`.
    pub fn start(tool: &'static str) -> Self {
        let span = info_span!(target: "toolbox_mcp::tools", "tool_invocation", tool);
        Self {
            span,
            started_at: Instant::now(),
            tool,
        }
    }

    /// Close the span as a success.
    pub fn finish_ok(self) {
        let elapsed_ms = self.started_at.elapsed().as_millis();
        let _entered = self.span.enter();
        info!(
            target: "toolbox_mcp::tools",
            tool = self.tool,
            status = "ok",
            elapsed_ms = elapsed_ms,
            "Completed tool invocation"
        );
    }

    /// Close the span as an operational error that will be reported as text.
    pub fn finish_err(self, err: &ToolError) {
        let elapsed_ms = self.started_at.elapsed().as_millis();
        let _entered = self.span.enter();
        warn!(
            target: "toolbox_mcp::tools",
            tool = self.tool,
            status = "operational_error",
            kind = err.kind(),
            error = %err,
            elapsed_ms = elapsed_ms,
            "Tool invocation returned an error result"
        );
    }

    /// Close the span according to `result`.
    pub fn finish<T>(self, result: &Result<T, ToolError>) {
        match result {
            Ok(_) => self.finish_ok(),
            Err(err) => self.finish_err(err),
        }
    }
}

/// Payload for logging MCP runtime state as structured telemetry.
#[derive(Debug, Serialize)]
pub struct RuntimeModeTelemetry<'a> {
    pub transport: &'a str,
    pub host: Option<&'a str>,
    pub port: Option<u16>,
    pub config_path: &'a str,
    pub credential_configured: bool,
    pub instructions: &'a str,
    pub launch_args: &'a [String],
}

/// Emit runtime mode to `tracing`.
pub fn emit_runtime_mode(telemetry: &RuntimeModeTelemetry<'_>) {
    info!(
        target: "toolbox_mcp::runtime",
        transport = telemetry.transport,
        host = telemetry.host.unwrap_or(""),
        port = telemetry.port.unwrap_or_default(),
        config_path = telemetry.config_path,
        credential_configured = telemetry.credential_configured,
        instructions = telemetry.instructions,
        launch_args = ?telemetry.launch_args,
        "Started MCP server"
    );
}
