//! CLI argument definitions and `LaunchProfile` construction.
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use super::{build_launch_args, resolve_config_path, LaunchProfile, TransportMode};

/// Command-line arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "toolbox-mcp",
    author,
    version,
    about = "Toolbox MCP server (greeting, math, time, geocoding, weather, images)",
    long_about = None
)]
pub struct LaunchProfileArgs {
    /// Select stdio (default) or tcp.
    #[arg(long, value_enum, default_value_t = TransportMode::Stdio)]
    pub transport: TransportMode,
    /// Path to config.toml (overrides TOOLBOX_CONFIG_PATH).
    #[arg(long = "config")]
    pub config_override: Option<PathBuf>,
    /// Inference credential (overrides [inference].token and HF_TOKEN).
    #[arg(long = "hf-token")]
    pub credential_override: Option<String>,
}

impl LaunchProfileArgs {
    /// Build a `LaunchProfile` from CLI args and environment variables.
    pub fn build(self) -> Result<LaunchProfile> {
        let config_path = resolve_config_path(self.config_override)?;
        let launch_args = build_launch_args(self.transport, config_path.as_deref());

        Ok(LaunchProfile {
            config_path,
            transport: self.transport,
            credential_override: self.credential_override,
            launch_args,
        })
    }
}
