//! Entry point for Toolbox MCP.
use std::process::ExitCode;

use clap::Parser;
use toolbox_mcp::{
    cli::{LaunchProfile, LaunchProfileArgs},
    lib::telemetry,
    server::{
        config::ServerConfig,
        runtime::{self, RuntimeExit},
    },
};

#[tokio::main]
async fn main() -> ExitCode {
    match bootstrap().await {
        Ok(_) => ExitCode::SUCCESS,
        Err(exit) => exit.report(),
    }
}

async fn bootstrap() -> Result<(), RuntimeExit> {
    telemetry::init_tracing().map_err(RuntimeExit::from_error)?;
    let profile = LaunchProfileArgs::parse()
        .build()
        .map_err(RuntimeExit::from_error)?;
    run_server(profile).await
}

async fn run_server(profile: LaunchProfile) -> Result<(), RuntimeExit> {
    let config = match profile.config_path.clone() {
        Some(path) => ServerConfig::load_from_path(path),
        None => ServerConfig::load_from_env_or_default(),
    }
    .map_err(RuntimeExit::from_error)?
    .with_credential_override(profile.credential_override.clone());
    runtime::run_server(profile, config).await
}
