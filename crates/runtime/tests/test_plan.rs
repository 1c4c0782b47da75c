use std::fs;

use anyhow::{Context, Result};
use httpmock::prelude::*;
use propconnect_config::AppConfig;
use propconnect_runtime::AppContext;
use serde_json::json;
use tempfile::TempDir;

fn build_config(base_url: String, storage_dir: &TempDir) -> AppConfig {
    let mut config = AppConfig::default();
    config.api.base_url = base_url;
    config.storage.directory = storage_dir.path().join("state").to_string_lossy().into_owned();
    config
}

async fn initialise(config: &AppConfig) -> Result<AppContext> {
    AppContext::initialise(config)
        .await
        .context("failed to initialise runtime")
}

fn stored_agent_session() -> String {
    json!({
        "version": 1,
        "principal": {
            "type": "agent",
            "agent": {
                "id": "agt_7",
                "email": "agent@example.com",
                "first_name": "Ada",
                "last_name": "Agent",
                "approval_status": "approved"
            },
            "token": "agent-token"
        },
        "user_type": "agent",
        "favorites": []
    })
    .to_string()
}

#[tokio::test(flavor = "multi_thread")]
async fn initialise_without_stored_session_starts_as_guest() -> Result<()> {
    let server = MockServer::start_async().await;
    let temp_dir = TempDir::new()?;
    let config = build_config(server.base_url(), &temp_dir);

    let context = initialise(&config).await?;

    assert!(!context.store.auth().is_authenticated());
    assert_eq!(context.client().base_url(), format!("{}/", server.base_url()));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn initialise_restores_a_valid_stored_session() -> Result<()> {
    let server = MockServer::start_async().await;
    let me = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/agents/me")
                .header("authorization", "Bearer agent-token");
            then.status(200).json_body(json!({
                "agent": {
                    "id": "agt_7",
                    "email": "agent@example.com",
                    "first_name": "Ada",
                    "last_name": "Agent-Smith",
                    "approval_status": "approved"
                }
            }));
        })
        .await;
    let temp_dir = TempDir::new()?;
    let config = build_config(server.base_url(), &temp_dir);
    fs::create_dir_all(&config.storage.directory)?;
    fs::write(
        format!("{}/{}.json", config.storage.directory, config.storage.key),
        stored_agent_session(),
    )?;

    let context = initialise(&config).await?;

    me.assert_async().await;
    let auth = context.store.auth();
    assert!(auth.is_agent_authenticated());
    assert_eq!(
        auth.current_agent().map(|agent| agent.last_name.as_str()),
        Some("Agent-Smith")
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn initialise_drops_a_rejected_session_and_rewrites_storage() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/agents/me");
            then.status(401).json_body(json!({ "error": "Token expired" }));
        })
        .await;
    let temp_dir = TempDir::new()?;
    let config = build_config(server.base_url(), &temp_dir);
    let path = format!("{}/{}.json", config.storage.directory, config.storage.key);
    fs::create_dir_all(&config.storage.directory)?;
    fs::write(&path, stored_agent_session())?;

    let context = initialise(&config).await?;

    assert!(!context.store.auth().is_authenticated());
    let rewritten = fs::read_to_string(&path)?;
    assert!(!rewritten.contains("agent-token"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn initialise_survives_an_unreachable_backend() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = build_config("http://127.0.0.1:9".into(), &temp_dir);
    fs::create_dir_all(&config.storage.directory)?;
    fs::write(
        format!("{}/{}.json", config.storage.directory, config.storage.key),
        stored_agent_session(),
    )?;

    let context = initialise(&config).await?;

    assert!(!context.store.auth().is_authenticated());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn dashboard_refresh_is_disabled_by_zero_interval() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut config = build_config("http://127.0.0.1:9".into(), &temp_dir);
    config.dashboard.refresh_interval_seconds = 0;

    let context = initialise(&config).await?;
    assert!(context.spawn_dashboard_refresh().is_none());

    config.dashboard.refresh_interval_seconds = 30;
    let context = initialise(&config).await?;
    let handle = context
        .spawn_dashboard_refresh()
        .context("refresh should start")?;
    handle.abort();
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn initialise_rejects_an_invalid_base_url() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = build_config("not a url".into(), &temp_dir);

    let error = match AppContext::initialise(&config).await {
        Ok(_) => panic!("expected an invalid base url to fail"),
        Err(error) => error,
    };
    assert!(format!("{error:?}").contains("failed to build api client"));
    Ok(())
}
