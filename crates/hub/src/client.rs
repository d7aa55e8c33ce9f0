// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP clients agents use to talk to the broker and the registry.
//!
//! These are thin request wrappers: no polling loop, retry, or backoff.
//! Callers decide how often to poll and what to do on failure. Errors
//! reported by the services come back as [`HubError`] inside the
//! `anyhow::Error`, reachable with `downcast_ref`.

use std::sync::Once;
use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;

use crate::broker::{Message, PollResult};
use crate::error::{ErrorResponse, HubError};
use crate::registry::{Meta, Pointer, Resource};
use crate::transport::broker_http::{SendResponse, SizeResponse};
use crate::transport::registry_http::{CreateRequest, CreateResponse, FetchResponse};

static CRYPTO_INIT: Once = Once::new();

/// Install the ring crypto provider for reqwest/rustls.
/// Safe to call multiple times; only the first call has effect.
pub fn ensure_crypto() {
    CRYPTO_INIT.call_once(|| {
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}

fn http_client() -> anyhow::Result<Client> {
    ensure_crypto();
    Ok(Client::builder().timeout(Duration::from_secs(10)).build()?)
}

/// Shared plumbing: base URL, optional bearer token, connection pool.
struct Endpoint {
    base_url: Url,
    auth_token: Option<String>,
    client: Client,
}

impl Endpoint {
    fn new(base_url: &str, auth_token: Option<String>) -> anyhow::Result<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("not a base url: {base_url}");
        }
        Ok(Self { base_url, auth_token, client: http_client()? })
    }

    /// Join path segments onto the base URL, percent-encoding each one.
    fn url(&self, segments: &[&str]) -> anyhow::Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("not a base url: {}", self.base_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn apply_auth(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.auth_token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> anyhow::Result<T> {
        let resp = self.apply_auth(self.client.get(url)).send().await?;
        decode(resp).await
    }
}

/// Turn a response into `T`, or into a [`HubError`] when the body carries
/// the service error envelope.
async fn decode<T: DeserializeOwned>(resp: Response) -> anyhow::Result<T> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp.json().await?);
    }
    let body = resp.bytes().await?;
    if let Ok(envelope) = serde_json::from_slice::<ErrorResponse>(&body) {
        if let Some(code) = HubError::from_code(&envelope.error.code) {
            return Err(anyhow::Error::new(code).context(envelope.error.message));
        }
    }
    anyhow::bail!("{status}: {}", String::from_utf8_lossy(&body))
}

/// Client for the message broker.
pub struct BrokerClient {
    endpoint: Endpoint,
}

impl BrokerClient {
    pub fn new(base_url: &str, auth_token: Option<String>) -> anyhow::Result<Self> {
        Ok(Self { endpoint: Endpoint::new(base_url, auth_token)? })
    }

    /// Enqueue `message`; returns the receiver's queue depth.
    pub async fn send(&self, message: &Message) -> anyhow::Result<usize> {
        let url = self.endpoint.url(&["broker", "send"])?;
        let req = self.endpoint.client.post(url).json(message);
        let resp = self.endpoint.apply_auth(req).send().await?;
        let ack: SendResponse = decode(resp).await?;
        Ok(ack.size)
    }

    /// Take the oldest message queued for `receiver`, if any. Never waits.
    pub async fn poll(&self, receiver: &str) -> anyhow::Result<Option<Message>> {
        let url = self.endpoint.url(&["broker", "poll", receiver])?;
        match self.endpoint.get::<PollResult>(url).await? {
            PollResult::Ok { message } => Ok(Some(message)),
            PollResult::Empty => Ok(None),
        }
    }

    /// Number of messages waiting for `receiver`.
    pub async fn size(&self, receiver: &str) -> anyhow::Result<usize> {
        let url = self.endpoint.url(&["broker", "size", receiver])?;
        let resp: SizeResponse = self.endpoint.get(url).await?;
        Ok(resp.size)
    }
}

/// Client for the context registry.
pub struct RegistryClient {
    endpoint: Endpoint,
}

impl RegistryClient {
    pub fn new(base_url: &str, token: impl Into<String>) -> anyhow::Result<Self> {
        Ok(Self { endpoint: Endpoint::new(base_url, Some(token.into()))? })
    }

    /// Publish `data` and get back the pointer to hand to peers.
    pub async fn create(
        &self,
        data: serde_json::Value,
        owner: &str,
        meta: Option<Meta>,
    ) -> anyhow::Result<Pointer> {
        let url = self.endpoint.url(&["mcp", "resources", "create"])?;
        let body = CreateRequest { data, owner: owner.to_owned(), meta };
        let req = self.endpoint.client.post(url).json(&body);
        let resp = self.endpoint.apply_auth(req).send().await?;
        let created: CreateResponse = decode(resp).await?;
        Ok(created.pointer)
    }

    /// Resolve a pointer (or bare id) to the stored resource.
    pub async fn fetch(&self, pointer: &str) -> anyhow::Result<Resource> {
        let mut url = self.endpoint.url(&["mcp", "resources", "resolve"])?;
        url.query_pairs_mut().append_pair("pointer", pointer);
        let resp: FetchResponse = self.endpoint.get(url).await?;
        Ok(resp.into_resource())
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
