// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP transport for the broker and the registry.

pub mod auth;
pub mod broker_http;
pub mod extract;
pub mod registry_http;

use std::any::Any;
use std::sync::Arc;

use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::HubError;
use crate::state::{BrokerState, RegistryState};

/// Unknown routes get the same envelope as every other failure.
pub async fn not_found() -> Response {
    HubError::NotFound.to_http_response("no such route").into_response()
}

/// A handler fault becomes `INTERNAL`; the process and every other
/// mailbox or resource are unaffected.
pub fn internal_fault(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown fault".to_owned());
    tracing::error!(err = %detail, "request handler panicked");
    HubError::Internal.to_http_response("internal server error").into_response()
}

/// Build the broker `Router`.
pub fn build_broker_router(state: Arc<BrokerState>) -> Router {
    Router::new()
        // Health (no auth)
        .route("/health", get(broker_http::health))
        // Delivery
        .route("/broker/send", post(broker_http::send))
        .route("/broker/poll/{agent}", get(broker_http::poll))
        .route("/broker/size/{agent}", get(broker_http::size))
        // Administrative inspection
        .route("/broker/mailboxes", get(broker_http::list_mailboxes))
        .route(
            "/broker/mailboxes/{agent}",
            get(broker_http::peek_mailbox).delete(broker_http::purge_mailbox),
        )
        .fallback(not_found)
        // Middleware
        .layer(middleware::from_fn_with_state(state.clone(), auth::auth_layer::<BrokerState>))
        .layer(CatchPanicLayer::custom(internal_fault))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Build the registry `Router`.
pub fn build_registry_router(state: Arc<RegistryState>) -> Router {
    Router::new()
        // Health (no auth)
        .route("/health", get(registry_http::health))
        // Resources
        .route("/mcp/resources/create", post(registry_http::create))
        .route("/mcp/resources/fetch/{rid}", get(registry_http::fetch))
        .route("/mcp/resources/resolve", get(registry_http::resolve))
        .route("/mcp/resources/list", get(registry_http::list))
        .fallback(not_found)
        // Middleware
        .layer(middleware::from_fn_with_state(state.clone(), auth::auth_layer::<RegistryState>))
        .layer(CatchPanicLayer::custom(internal_fault))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
