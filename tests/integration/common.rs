use std::{io, path::PathBuf, process::Stdio, sync::Arc};

use anyhow::{Context, Result};
use rmcp::{
    model::{CallToolRequestParam, CallToolResult, ClientInfo},
    serve_client,
    service::RunningService,
    RoleClient, ServiceExt,
};
use serde_json::Value;
use tokio::{
    io::{AsyncRead, AsyncReadExt, AsyncWrite, ReadBuf},
    process::{Child, ChildStdin, ChildStdout, Command},
    task::JoinHandle,
};

use toolbox_mcp::{
    lib::{http::ReqwestFetcher, inference::HfInferenceClient},
    server::{
        config::ServerConfig,
        runtime::{OutboundClients, ToolboxServer},
    },
};

pub const BINARY_PATH: &str = env!("CARGO_BIN_EXE_toolbox-mcp");

pub type TestClient = RunningService<RoleClient, ClientInfo>;

pub async fn spawn_server_process() -> Result<(Child, ChildIoBridge, Option<JoinHandle<()>>)> {
    let mut command = Command::new(BINARY_PATH);
    command
        .env(
            "TOOLBOX_CONFIG_PATH",
            fixture("tests/fixtures/config_valid.toml"),
        )
        .env_remove("HF_TOKEN")
        .stdout(Stdio::piped())
        .stdin(Stdio::piped())
        .stderr(Stdio::piped());
    let mut child = command.spawn().context("failed to spawn server process")?;
    let stdout = child.stdout.take().expect("child stdout");
    let stdin = child.stdin.take().expect("child stdin");
    let bridge = ChildIoBridge::new(stdout, stdin);
    let stderr_handle = child.stderr.take().map(|mut stderr| {
        tokio::spawn(async move {
            let mut buf = Vec::new();
            let _ = stderr.read_to_end(&mut buf).await;
        })
    });
    Ok((child, bridge, stderr_handle))
}

pub fn fixture(relative: &str) -> String {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    root.join(relative).display().to_string()
}

/// Config whose outbound endpoints all point at `base_url`.
pub fn config_for(base_url: &str, token: Option<&str>) -> ServerConfig {
    let mut config = ServerConfig::default();
    config.http.geocode_url = format!("{base_url}/search");
    config.http.weather_url = format!("{base_url}/v1/forecast");
    config.http.user_agent = "toolbox-mcp-tests/0.1".into();
    config.inference.base_url = format!("{base_url}/models");
    config.inference.token = token.map(str::to_string);
    config
}

/// Server wired to real `reqwest` clients.
pub fn live_server(config: ServerConfig) -> Result<ToolboxServer> {
    let clients = OutboundClients {
        http: Arc::new(ReqwestFetcher::new()?),
        inference: Arc::new(HfInferenceClient::new(config.inference.base_url.clone())?),
    };
    Ok(ToolboxServer::with_clients(
        config,
        "integration".into(),
        clients,
    )?)
}

/// Serve `server` over an in-memory duplex pipe and connect a client to it.
pub async fn connect(server: ToolboxServer) -> Result<(TestClient, JoinHandle<Result<()>>)> {
    let (server_transport, client_transport) = tokio::io::duplex(64 * 1024);
    let server_task = tokio::spawn(async move {
        server.serve(server_transport).await?.waiting().await?;
        Result::<_, anyhow::Error>::Ok(())
    });
    let client = serve_client(ClientInfo::default(), client_transport).await?;
    Ok((client, server_task))
}

pub async fn shutdown(client: TestClient, server_task: JoinHandle<Result<()>>) {
    let _ = client.cancel().await;
    let _ = server_task.await;
}

pub async fn call(client: &TestClient, name: &str, arguments: Value) -> Result<CallToolResult> {
    let arguments = arguments.as_object().cloned();
    Ok(client
        .call_tool(CallToolRequestParam {
            name: name.to_string().into(),
            arguments,
        })
        .await?)
}

/// Text of the first content item.
pub fn first_text(result: &CallToolResult) -> String {
    let value = serde_json::to_value(result).expect("serializable");
    value["content"][0]["text"]
        .as_str()
        .unwrap_or_default()
        .to_string()
}

pub struct ChildIoBridge {
    stdout: ChildStdout,
    stdin: ChildStdin,
}

impl ChildIoBridge {
    pub fn new(stdout: ChildStdout, stdin: ChildStdin) -> Self {
        Self { stdout, stdin }
    }
}

impl AsyncRead for ChildIoBridge {
    fn poll_read(
        mut self: std::pin::Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> std::task::Poll<io::Result<()>> {
        std::pin::Pin::new(&mut self.stdout).poll_read(cx, buf)
    }
}

impl AsyncWrite for ChildIoBridge {
    fn poll_write(
        mut self: std::pin::Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
        data: &[u8],
    ) -> std::task::Poll<io::Result<usize>> {
        std::pin::Pin::new(&mut self.stdin).poll_write(cx, data)
    }

    fn poll_flush(
        mut self: std::pin::Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<io::Result<()>> {
        std::pin::Pin::new(&mut self.stdin).poll_flush(cx)
    }

    fn poll_shutdown(
        mut self: std::pin::Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<io::Result<()>> {
        std::pin::Pin::new(&mut self.stdin).poll_shutdown(cx)
    }
}
