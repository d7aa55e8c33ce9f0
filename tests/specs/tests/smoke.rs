// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end smoke tests that spawn the real `a2ahub` binary for each
//! service and drive them with the agent clients.

use std::collections::HashSet;
use std::time::Duration;

use serde_json::json;

use a2ahub::broker::Message;
use a2ahub::client::{BrokerClient, RegistryClient};
use a2ahub::error::HubError;
use a2ahub_specs::HubProcess;

const TIMEOUT: Duration = Duration::from_secs(10);
const TOKEN: &str = "smoke-secret";

#[tokio::test]
async fn health_endpoints_are_open() -> anyhow::Result<()> {
    let broker = HubProcess::broker(Some("broker-secret"))?;
    let registry = HubProcess::registry(TOKEN)?;
    broker.wait_healthy(TIMEOUT).await?;
    registry.wait_healthy(TIMEOUT).await?;

    let body: serde_json::Value =
        reqwest::get(format!("{}/health", broker.base_url())).await?.json().await?;
    assert_eq!(body["status"], "running");
    assert_eq!(body["queued"], 0);

    let body: serde_json::Value =
        reqwest::get(format!("{}/health", registry.base_url())).await?.json().await?;
    assert_eq!(body["resources"], 0);
    Ok(())
}

#[tokio::test]
async fn publish_notify_poll_fetch_scenario() -> anyhow::Result<()> {
    let broker_proc = HubProcess::broker(None)?;
    let registry_proc = HubProcess::registry(TOKEN)?;
    broker_proc.wait_healthy(TIMEOUT).await?;
    registry_proc.wait_healthy(TIMEOUT).await?;

    let broker = BrokerClient::new(&broker_proc.base_url(), None)?;
    let registry = RegistryClient::new(&registry_proc.base_url(), TOKEN)?;

    // A publishes and notifies B with the pointer only.
    let pointer = registry.create(json!("hello"), "A", Some(Default::default())).await?;
    let note = Message::new("A", "B", "notify", json!({ "pointer": pointer.to_string() }), "c1");
    broker.send(&note).await?;

    // B discovers the work and resolves the pointer.
    let received = broker.poll("B").await?.ok_or_else(|| anyhow::anyhow!("B had no message"))?;
    assert_eq!(received.conversation_id, "c1");
    let shared = received.payload["pointer"]
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("payload has no pointer"))?;
    let resource = registry.fetch(shared).await?;
    assert_eq!(
        serde_json::to_value(&resource)?,
        json!({ "data": "hello", "owner": "A", "meta": {} })
    );
    assert_eq!(broker.poll("B").await?, None);

    // B replies; A picks up the result on the same conversation.
    let reply = Message::new("B", "A", "result", json!({ "summary": "ok" }), "c1");
    broker.send(&reply).await?;
    assert_eq!(broker.poll("A").await?, Some(reply));
    Ok(())
}

#[tokio::test]
async fn parallel_creates_yield_distinct_pointers() -> anyhow::Result<()> {
    let registry_proc = HubProcess::registry(TOKEN)?;
    registry_proc.wait_healthy(TIMEOUT).await?;
    let registry = RegistryClient::new(&registry_proc.base_url(), TOKEN)?;

    let creates = (0..200).map(|n| {
        let registry = &registry;
        async move {
            let pointer = registry.create(json!(format!("doc-{n}")), "A", None).await?;
            anyhow::Ok((pointer, n))
        }
    });
    let results = futures_util::future::try_join_all(creates).await?;

    let distinct: HashSet<String> = results.iter().map(|(p, _)| p.to_string()).collect();
    assert_eq!(distinct.len(), results.len());
    for (pointer, n) in &results {
        let resource = registry.fetch(&pointer.to_string()).await?;
        assert_eq!(resource.data, json!(format!("doc-{n}")));
    }
    Ok(())
}

#[tokio::test]
async fn registry_rejects_wrong_credential() -> anyhow::Result<()> {
    let registry_proc = HubProcess::registry(TOKEN)?;
    registry_proc.wait_healthy(TIMEOUT).await?;
    let intruder = RegistryClient::new(&registry_proc.base_url(), "guess")?;

    let err = match intruder.create(json!("x"), "mallory", None).await {
        Ok(p) => anyhow::bail!("create succeeded with wrong credential: {p}"),
        Err(e) => e,
    };
    assert_eq!(err.downcast_ref::<HubError>(), Some(&HubError::Unauthorized));

    let body: serde_json::Value =
        reqwest::get(format!("{}/health", registry_proc.base_url())).await?.json().await?;
    assert_eq!(body["resources"], 0);
    Ok(())
}

#[tokio::test]
async fn registry_refuses_to_start_with_empty_token() -> anyhow::Result<()> {
    let mut registry = HubProcess::spawn("registry", &["--token".to_owned(), String::new()])?;
    let status = registry.wait_exit(TIMEOUT).await?;
    assert_eq!(status.code(), Some(2));
    Ok(())
}
