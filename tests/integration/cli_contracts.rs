use std::fs;
use std::sync::Arc;
use tempfile::TempDir;
use twitch_bridge::platform::memory::MemoryConnectionFactory;
use twitch_bridge::tooling::cli::{CliContext, Commands};
use twitch_bridge::ConnectionProvider;

const CONFIG: &str = r#"
[credentials]
client_id = "client-abc"
client_secret = "secret"
access_token = "token-xyz"
user_id = "U1"

[[links]]
entity_id = "E1"
attribute = "clip"
command = "POST_CREATE_CLIP"

[[links]]
entity_id = "E1"
attribute = "chat"
command = "SUB_CHAT_MESSAGES"
"#;

fn context_from(contents: &str) -> (TempDir, CliContext) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bridge.toml");
    fs::write(&path, contents).unwrap();
    let ctx = CliContext::new(Some(path)).unwrap();
    (dir, ctx)
}

#[test]
fn commands_json_contract_has_required_fields() {
    let (_dir, ctx) = context_from(CONFIG);
    let output = ctx
        .execute(&Commands::Commands {
            format: "json".to_string(),
        })
        .unwrap();

    let rows: Vec<serde_json::Value> = serde_json::from_str(&output).unwrap();
    assert_eq!(rows.len(), 14);
    for row in rows {
        assert!(row.get("command").and_then(|v| v.as_str()).is_some());
        assert!(row.get("mode").and_then(|v| v.as_str()).is_some());
        assert!(row.get("event").is_some());
        assert!(row.get("requires").is_some());
    }
}

#[test]
fn check_config_warns_about_missing_username() {
    let (_dir, ctx) = context_from(CONFIG);
    let output = ctx.execute(&Commands::CheckConfig).unwrap();
    assert!(output.contains("Status: valid"));
    assert!(output.contains("credentials.username"));
}

#[test]
fn check_config_fails_without_client() {
    let (_dir, ctx) = context_from("[credentials]\naccess_token = \"tok\"\n");
    let err = ctx.execute(&Commands::CheckConfig).unwrap_err();
    assert!(err.is_config());
    assert!(err.to_string().contains("client_secret"));
}

#[test]
fn invoke_contract_reports_state_and_events() {
    let (_dir, ctx) = context_from(CONFIG);
    let provider = Arc::new(ConnectionProvider::new(Arc::new(MemoryConnectionFactory::new())));

    let output = ctx
        .invoke("E1", "clip", serde_json::json!(true), provider)
        .unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["state"], "linked_pull");
    let events = parsed["events"].as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert!(events[0].get("timestamp").and_then(|v| v.as_i64()).is_some());
}

#[test]
fn invoke_inert_link_is_an_error() {
    let (_dir, ctx) = context_from(CONFIG);
    let provider = Arc::new(ConnectionProvider::new(Arc::new(MemoryConnectionFactory::new())));

    let err = ctx
        .invoke("E1", "chat", serde_json::json!(true), provider)
        .unwrap_err();
    assert!(err.is_config());
}
