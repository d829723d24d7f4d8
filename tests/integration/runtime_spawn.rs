use std::{collections::BTreeSet, time::Duration};

use anyhow::Result;
use rmcp::{model::ClientInfo, serve_client};
use tokio::time::timeout;

use crate::common::spawn_server_process;

#[tokio::test]
async fn stdio_spawn_lists_all_tools() -> Result<()> {
    let (mut child, transport, stderr_task) = spawn_server_process().await?;

    let client = serve_client(ClientInfo::default(), transport).await?;
    let info = client.peer_info().cloned().expect("server info after handshake");
    assert_eq!(info.server_info.name, "toolbox-mcp");
    assert!(info
        .instructions
        .as_deref()
        .unwrap_or_default()
        .contains("disabled"));

    let list = client.list_all_tools().await?;
    let names: BTreeSet<String> = list.iter().map(|tool| tool.name.to_string()).collect();
    let expected: BTreeSet<String> = [
        "greet",
        "calculator",
        "get-time",
        "geocode",
        "get-weather",
        "generate-image",
    ]
    .into_iter()
    .map(str::to_string)
    .collect();
    assert_eq!(names, expected);

    client.cancel().await?;
    let status = timeout(Duration::from_secs(5), child.wait()).await??;
    assert!(
        status.success(),
        "server should exit cleanly but exit status was {status:?}"
    );
    if let Some(handle) = stderr_task {
        let _ = handle.await;
    }
    Ok(())
}
