// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP handlers for the context registry. Every route here except
//! `/health` sits behind the bearer middleware.

use std::sync::Arc;

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::HubError;
use crate::registry::{Meta, Pointer, Resource, ResourceId, ResourceSummary};
use crate::state::RegistryState;
use crate::transport::extract::{ApiJson, ApiPath, ApiQuery};

// -- Request/Response types ---------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub resources: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateRequest {
    pub data: serde_json::Value,
    pub owner: String,
    #[serde(default)]
    pub meta: Option<Meta>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateResponse {
    pub pointer: Pointer,
    pub rid: ResourceId,
}

/// Spelled out field by field: `#[serde(flatten)]` buffers its input and
/// would lose arbitrary-precision numbers on the client side.
#[derive(Debug, Serialize, Deserialize)]
pub struct FetchResponse {
    pub rid: ResourceId,
    pub data: serde_json::Value,
    pub owner: String,
    pub meta: Meta,
}

impl FetchResponse {
    pub fn new(rid: ResourceId, resource: &Resource) -> Self {
        Self {
            rid,
            data: resource.data.clone(),
            owner: resource.owner.clone(),
            meta: resource.meta.clone(),
        }
    }

    pub fn into_resource(self) -> Resource {
        Resource { data: self.data, owner: self.owner, meta: self.meta }
    }
}

#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    #[serde(default)]
    pub pointer: Option<String>,
}

// -- Handlers -----------------------------------------------------------------

/// `GET /health`
pub async fn health(State(s): State<Arc<RegistryState>>) -> impl IntoResponse {
    Json(HealthResponse { status: "running".to_owned(), resources: s.store.len() })
}

/// `POST /mcp/resources/create` — store a payload, return its pointer.
pub async fn create(
    State(s): State<Arc<RegistryState>>,
    ApiJson(req): ApiJson<CreateRequest>,
) -> Response {
    let owner = req.owner.clone();
    match s.store.create(req.data, req.owner, req.meta) {
        Ok(pointer) => {
            let rid = pointer.id();
            tracing::debug!(rid = %rid, owner = %owner, "resource created");
            Json(CreateResponse { pointer, rid }).into_response()
        }
        Err(code) => code.to_http_response("owner must be non-empty").into_response(),
    }
}

/// `GET /mcp/resources/fetch/{rid}` — `rid` may be a bare id or a full pointer.
pub async fn fetch(
    State(s): State<Arc<RegistryState>>,
    ApiPath(rid): ApiPath<String>,
) -> Response {
    lookup(&s, &rid)
}

/// `GET /mcp/resources/resolve?pointer=...`
pub async fn resolve(
    State(s): State<Arc<RegistryState>>,
    ApiQuery(query): ApiQuery<ResolveQuery>,
) -> Response {
    match query.pointer {
        Some(pointer) => lookup(&s, &pointer),
        None => {
            HubError::InvalidInput.to_http_response("missing pointer parameter").into_response()
        }
    }
}

/// `GET /mcp/resources/list` — summaries without payloads.
pub async fn list(State(s): State<Arc<RegistryState>>) -> Json<Vec<ResourceSummary>> {
    Json(s.store.list())
}

fn lookup(state: &RegistryState, raw: &str) -> Response {
    match state.store.fetch(raw) {
        Ok((rid, resource)) => {
            tracing::debug!(rid = %rid, "resource fetched");
            Json(FetchResponse::new(rid, &resource)).into_response()
        }
        Err(code) => code.to_http_response("resource not found").into_response(),
    }
}
