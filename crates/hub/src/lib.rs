// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A2A hub: a mailbox broker and a pointer-issuing context registry for
//! cooperating agent processes.

pub mod broker;
pub mod client;
pub mod config;
pub mod error;
pub mod registry;
pub mod state;
pub mod transport;

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::config::{BrokerConfig, RegistryConfig};
use crate::registry::ContextStore;
use crate::state::{BrokerState, RegistryState};
use crate::transport::{build_broker_router, build_registry_router};

/// Run the broker until Ctrl-C / SIGTERM.
pub async fn run_broker(config: BrokerConfig) -> anyhow::Result<()> {
    let shutdown = CancellationToken::new();
    spawn_signal_handler(shutdown.clone());

    let listener = TcpListener::bind(config.addr()).await?;
    if config.auth_token.is_some() {
        tracing::info!("broker listening on {} (auth enabled)", listener.local_addr()?);
    } else {
        tracing::info!("broker listening on {}", listener.local_addr()?);
    }

    let state = Arc::new(BrokerState::new(config.auth_token));
    serve_broker(listener, state, shutdown).await
}

/// Run the registry until Ctrl-C / SIGTERM.
pub async fn run_registry(config: RegistryConfig) -> anyhow::Result<()> {
    config.validate()?;
    let shutdown = CancellationToken::new();
    spawn_signal_handler(shutdown.clone());

    let listener = TcpListener::bind(config.addr()).await?;
    tracing::info!(
        "registry listening on {} (pointers: {}://{}/<id>)",
        listener.local_addr()?,
        config.pointer_scheme,
        config.pointer_kind
    );

    let store = ContextStore::new(config.pointer_scheme, config.pointer_kind);
    let state = Arc::new(RegistryState::new(store, config.token));
    serve_registry(listener, state, shutdown).await
}

/// Serve the broker on an already-bound listener until `shutdown` fires.
pub async fn serve_broker(
    listener: TcpListener,
    state: Arc<BrokerState>,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    axum::serve(listener, build_broker_router(state))
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await?;
    tracing::info!("broker stopped");
    Ok(())
}

/// Serve the registry on an already-bound listener until `shutdown` fires.
pub async fn serve_registry(
    listener: TcpListener,
    state: Arc<RegistryState>,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    axum::serve(listener, build_registry_router(state))
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await?;
    tracing::info!("registry stopped");
    Ok(())
}

fn spawn_signal_handler(shutdown: CancellationToken) {
    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            let mut sigterm = match signal(SignalKind::terminate()) {
                Ok(s) => s,
                Err(e) => {
                    tracing::warn!("cannot install SIGTERM handler: {e}");
                    let _ = tokio::signal::ctrl_c().await;
                    shutdown.cancel();
                    return;
                }
            };
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = sigterm.recv() => {}
            }
        }
        #[cfg(not(unix))]
        {
            let _ = tokio::signal::ctrl_c().await;
        }
        tracing::info!("shutdown requested");
        shutdown.cancel();
    });
}
