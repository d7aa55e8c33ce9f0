// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::routing::get;
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;

use super::{build_broker_router, internal_fault};
use crate::state::BrokerState;

async fn error_code(resp: axum::response::Response) -> anyhow::Result<String> {
    let body = to_bytes(resp.into_body(), usize::MAX).await?;
    let json: Value = serde_json::from_slice(&body)?;
    Ok(json["error"]["code"].as_str().unwrap_or_default().to_owned())
}

#[tokio::test]
async fn handler_panic_becomes_internal_envelope() -> anyhow::Result<()> {
    let router: Router = Router::new()
        .route("/boom", get(|| async { panic!("handler fault") as () }))
        .route("/fine", get(|| async { "ok" }))
        .layer(CatchPanicLayer::custom(internal_fault));

    let resp = router.clone().oneshot(Request::get("/boom").body(Body::empty())?).await?;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error_code(resp).await?, "INTERNAL");

    let resp = router.oneshot(Request::get("/fine").body(Body::empty())?).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn unknown_broker_route_is_not_found_envelope() -> anyhow::Result<()> {
    let router = build_broker_router(Arc::new(BrokerState::new(None)));
    let resp = router.oneshot(Request::get("/broker/nope").body(Body::empty())?).await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_code(resp).await?, "NOT_FOUND");
    Ok(())
}
