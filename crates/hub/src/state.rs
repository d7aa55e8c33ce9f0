// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::broker::Mailboxes;
use crate::registry::ContextStore;

/// Shared broker state, owned by the router for the process lifetime.
pub struct BrokerState {
    pub mailboxes: Mailboxes,
    /// Bearer token for broker routes. `None` leaves the broker open.
    pub auth_token: Option<String>,
}

impl BrokerState {
    pub fn new(auth_token: Option<String>) -> Self {
        Self { mailboxes: Mailboxes::new(), auth_token }
    }
}

/// Shared registry state. The credential is mandatory.
pub struct RegistryState {
    pub store: ContextStore,
    pub token: String,
}

impl RegistryState {
    pub fn new(store: ContextStore, token: impl Into<String>) -> Self {
        Self { store, token: token.into() }
    }
}
