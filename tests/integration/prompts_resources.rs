use anyhow::Result;
use rmcp::model::{GetPromptRequestParam, ReadResourceRequestParam};
use serde_json::{json, Value};

use toolbox_mcp::server::config::ServerConfig;

use crate::common::{connect, live_server, shutdown};

#[tokio::test]
async fn code_review_prompt_renders_one_user_message() -> Result<()> {
    let (client, task) = connect(live_server(ServerConfig::default())?).await?;

    let prompts = client.list_all_prompts().await?;
    let rendered = client
        .get_prompt(GetPromptRequestParam {
            name: "code-review".into(),
            arguments: json!({ "code": "fn main() {}", "language": "rust" })
                .as_object()
                .cloned(),
        })
        .await?;
    shutdown(client, task).await;

    let listed = serde_json::to_value(&prompts)?;
    assert_eq!(listed[0]["name"], "code-review");
    assert_eq!(listed[0]["arguments"][0]["name"], "code");
    assert_eq!(listed[0]["arguments"][0]["required"], true);

    let value = serde_json::to_value(&rendered)?;
    let messages = value["messages"].as_array().cloned().unwrap_or_default();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["role"], "user");
    let text = messages[0]["content"]["text"].as_str().unwrap_or_default();
    assert!(text.contains("```rust\nfn main() {}\n```"), "{text}");
    Ok(())
}

#[tokio::test]
async fn code_review_prompt_requires_code() -> Result<()> {
    let (client, task) = connect(live_server(ServerConfig::default())?).await?;
    let outcome = client
        .get_prompt(GetPromptRequestParam {
            name: "code-review".into(),
            arguments: json!({ "language": "rust" }).as_object().cloned(),
        })
        .await;
    let unknown = client
        .get_prompt(GetPromptRequestParam {
            name: "nope".into(),
            arguments: None,
        })
        .await;
    shutdown(client, task).await;

    assert!(outcome.is_err(), "missing `code` must be rejected");
    assert!(unknown.is_err(), "unknown prompt must be rejected");
    Ok(())
}

#[tokio::test]
async fn server_info_resource_lists_every_tool() -> Result<()> {
    let (client, task) = connect(live_server(ServerConfig::default())?).await?;

    let resources = client.list_all_resources().await?;
    let tools = client.list_all_tools().await?;
    let read = client
        .read_resource(ReadResourceRequestParam {
            uri: "server://info".into(),
        })
        .await?;
    let missing = client
        .read_resource(ReadResourceRequestParam {
            uri: "server://missing".into(),
        })
        .await;
    shutdown(client, task).await;

    let listed = serde_json::to_value(&resources)?;
    assert_eq!(listed[0]["uri"], "server://info");
    assert_eq!(listed[0]["mimeType"], "application/json");

    let value = serde_json::to_value(&read)?;
    assert_eq!(value["contents"][0]["mimeType"], "application/json");
    let body: Value =
        serde_json::from_str(value["contents"][0]["text"].as_str().unwrap_or_default())?;
    assert_eq!(body["name"], "toolbox-mcp");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(
        body["tools"].as_array().map(Vec::len),
        Some(tools.len())
    );
    assert!(missing.is_err());
    Ok(())
}
