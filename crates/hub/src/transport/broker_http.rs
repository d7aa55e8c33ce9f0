// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP handlers for the message broker.

use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::broker::{MailboxInfo, Message, PollResult};
use crate::state::BrokerState;
use crate::transport::extract::{ApiJson, ApiPath};

// -- Request/Response types ---------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub mailboxes: usize,
    pub queued: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SendResponse {
    pub status: String,
    pub receiver: String,
    pub size: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SizeResponse {
    pub agent: String,
    pub size: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PeekResponse {
    pub agent: String,
    pub messages: Vec<Message>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PurgeResponse {
    pub agent: String,
    pub purged: usize,
}

// -- Handlers -----------------------------------------------------------------

/// `GET /health`
pub async fn health(State(s): State<Arc<BrokerState>>) -> impl IntoResponse {
    let (mailboxes, queued) = s.mailboxes.stats();
    Json(HealthResponse { status: "running".to_owned(), mailboxes, queued })
}

/// `POST /broker/send` — enqueue a message for its receiver.
pub async fn send(
    State(s): State<Arc<BrokerState>>,
    ApiJson(message): ApiJson<Message>,
) -> impl IntoResponse {
    let receiver = message.receiver.clone();
    let sender = message.sender.clone();
    match s.mailboxes.send(message) {
        Ok(size) => {
            tracing::debug!(sender = %sender, receiver = %receiver, size, "message enqueued");
            Json(SendResponse { status: "enqueued".to_owned(), receiver, size }).into_response()
        }
        Err(code) => {
            code.to_http_response("sender and receiver must be non-empty").into_response()
        }
    }
}

/// `GET /broker/poll/{agent}` — dequeue the oldest message, if any.
pub async fn poll(
    State(s): State<Arc<BrokerState>>,
    ApiPath(agent): ApiPath<String>,
) -> Json<PollResult> {
    let message = s.mailboxes.poll(&agent);
    if let Some(ref m) = message {
        tracing::debug!(receiver = %agent, sender = %m.sender, kind = %m.kind, "message delivered");
    }
    Json(PollResult::from(message))
}

/// `GET /broker/size/{agent}`
pub async fn size(
    State(s): State<Arc<BrokerState>>,
    ApiPath(agent): ApiPath<String>,
) -> Json<SizeResponse> {
    let size = s.mailboxes.size(&agent);
    Json(SizeResponse { agent, size })
}

/// `GET /broker/mailboxes` — depth of every known mailbox.
pub async fn list_mailboxes(State(s): State<Arc<BrokerState>>) -> Json<Vec<MailboxInfo>> {
    Json(s.mailboxes.list())
}

/// `GET /broker/mailboxes/{agent}` — view queued messages without consuming them.
pub async fn peek_mailbox(
    State(s): State<Arc<BrokerState>>,
    ApiPath(agent): ApiPath<String>,
) -> Json<PeekResponse> {
    let messages = s.mailboxes.peek(&agent);
    Json(PeekResponse { agent, messages })
}

/// `DELETE /broker/mailboxes/{agent}` — drop everything queued for an agent.
pub async fn purge_mailbox(
    State(s): State<Arc<BrokerState>>,
    ApiPath(agent): ApiPath<String>,
) -> Json<PurgeResponse> {
    let purged = s.mailboxes.purge(&agent);
    tracing::info!(agent = %agent, purged, "mailbox purged");
    Json(PurgeResponse { agent, purged })
}
