// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderMap, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::error::HubError;
use crate::state::{BrokerState, RegistryState};

/// State that knows which bearer credential its routes require.
pub trait BearerGate {
    /// The configured credential, or `None` for an open service.
    fn credential(&self) -> Option<&str>;

    /// Admit the request only if it presents the configured credential.
    fn authorize(&self, headers: &HeaderMap) -> Result<(), HubError> {
        let Some(credential) = self.credential() else {
            return Ok(());
        };
        match presented_token(headers) {
            Some(token) if tokens_match(token.as_bytes(), credential.as_bytes()) => Ok(()),
            _ => Err(HubError::Unauthorized),
        }
    }
}

impl BearerGate for BrokerState {
    fn credential(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }
}

impl BearerGate for RegistryState {
    fn credential(&self) -> Option<&str> {
        Some(&self.token)
    }
}

/// Token from `Authorization: Bearer <token>`; any other scheme is absent.
fn presented_token(headers: &HeaderMap) -> Option<&str> {
    headers.get(header::AUTHORIZATION)?.to_str().ok()?.strip_prefix("Bearer ")
}

/// Length-then-content comparison whose running time does not depend on
/// where the first differing byte sits.
fn tokens_match(presented: &[u8], credential: &[u8]) -> bool {
    presented.len() == credential.len()
        && presented.iter().zip(credential).fold(0u8, |diff, (p, c)| diff | (p ^ c)) == 0
}

/// Rejects requests to gated routes before any handler touches state.
///
/// `/health` stays open so supervisors can check liveness without the
/// credential.
pub async fn auth_layer<S>(
    State(state): State<Arc<S>>,
    req: Request<axum::body::Body>,
    next: Next,
) -> Response
where
    S: BearerGate + Send + Sync + 'static,
{
    if req.uri().path() != "/health" {
        if let Err(code) = state.authorize(req.headers()) {
            tracing::warn!(path = %req.uri().path(), "rejected request without valid credential");
            return code.to_http_response("missing or invalid credential").into_response();
        }
    }
    next.run(req).await
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
