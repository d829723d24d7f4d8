//! LaunchProfile and config path resolution.
use std::{
    env,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::ValueEnum;

use crate::server::config::CONFIG_ENV_KEY;

/// MCP transport mode.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum TransportMode {
    Stdio,
    Tcp,
}

impl TransportMode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TransportMode::Stdio => "stdio",
            TransportMode::Tcp => "tcp",
        }
    }
}

/// Resolved launch profile.
#[derive(Debug, Clone)]
pub struct LaunchProfile {
    /// Explicitly requested config file; `None` means the optional default.
    pub config_path: Option<PathBuf>,
    pub transport: TransportMode,
    /// Inference credential passed on the command line.
    pub credential_override: Option<String>,
    pub launch_args: Vec<String>,
}

/// Resolve an explicit config path in the order: CLI override → env var.
pub fn resolve_config_path(override_path: Option<PathBuf>) -> Result<Option<PathBuf>> {
    let path = override_path.or_else(|| {
        env::var_os(CONFIG_ENV_KEY)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
    });

    match path {
        Some(path) if path.is_relative() => {
            let cwd = env::current_dir().context("failed to obtain current directory")?;
            Ok(Some(cwd.join(path)))
        }
        other => Ok(other),
    }
}

/// Build launch arguments suitable for reproduction/logging.
///
/// The credential is deliberately left out.
pub fn build_launch_args(transport: TransportMode, config: Option<&Path>) -> Vec<String> {
    let mut args = vec![format!("--transport={}", transport.as_str())];
    if let Some(config) = config {
        args.push(format!("--config={}", config.display()));
    }
    args
}
