// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Write-once content store that issues pointers.
//!
//! Resources live until the process exits. There is no update, delete, or
//! eviction, so a pointer that resolved once resolves forever after.

pub mod pointer;

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::HubError;
pub use pointer::{Pointer, ResourceId};

/// Free-form annotations attached to a resource (topic, source, ...).
pub type Meta = serde_json::Map<String, serde_json::Value>;

/// An immutable stored payload plus ownership metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub data: serde_json::Value,
    pub owner: String,
    #[serde(default)]
    pub meta: Meta,
}

/// Listing entry; carries everything except the payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceSummary {
    pub rid: ResourceId,
    pub owner: String,
    pub meta: Meta,
}

struct Stored {
    seq: u64,
    resource: Arc<Resource>,
}

/// Registry state: id → resource, plus the pointer shape it issues.
pub struct ContextStore {
    scheme: String,
    kind: String,
    entries: RwLock<HashMap<ResourceId, Stored>>,
}

impl ContextStore {
    pub fn new(scheme: impl Into<String>, kind: impl Into<String>) -> Self {
        Self { scheme: scheme.into(), kind: kind.into(), entries: RwLock::new(HashMap::new()) }
    }

    pub fn pointer_for(&self, id: ResourceId) -> Pointer {
        Pointer::new(self.scheme.as_str(), self.kind.as_str(), id)
    }

    /// Store a new resource and return the pointer that resolves to it.
    pub fn create(
        &self,
        data: serde_json::Value,
        owner: impl Into<String>,
        meta: Option<Meta>,
    ) -> Result<Pointer, HubError> {
        let owner = owner.into();
        if owner.trim().is_empty() {
            return Err(HubError::InvalidInput);
        }
        let resource = Arc::new(Resource { data, owner, meta: meta.unwrap_or_default() });

        let mut entries = self.entries.write();
        // Entries are never removed, so the map size is a unique creation sequence.
        let seq = entries.len() as u64;
        loop {
            let id = ResourceId::new_v4();
            if let Entry::Vacant(slot) = entries.entry(id) {
                slot.insert(Stored { seq, resource });
                return Ok(self.pointer_for(id));
            }
        }
    }

    /// Resolve a bare id or a full pointer issued by this store.
    pub fn resolve(&self, raw: &str) -> Option<ResourceId> {
        if raw.contains("://") {
            let pointer = Pointer::parse(raw)?;
            if pointer.scheme() != self.scheme || pointer.kind() != self.kind {
                return None;
            }
            Some(pointer.id())
        } else {
            raw.parse().ok()
        }
    }

    /// Look up a resource by bare id or pointer. Never mutates.
    pub fn fetch(&self, raw: &str) -> Result<(ResourceId, Arc<Resource>), HubError> {
        let id = self.resolve(raw).ok_or(HubError::NotFound)?;
        let entries = self.entries.read();
        let stored = entries.get(&id).ok_or(HubError::NotFound)?;
        Ok((id, Arc::clone(&stored.resource)))
    }

    /// Summaries of every resource, oldest first.
    pub fn list(&self) -> Vec<ResourceSummary> {
        let entries = self.entries.read();
        let mut ordered: Vec<(&ResourceId, &Stored)> = entries.iter().collect();
        ordered.sort_by_key(|(_, stored)| stored.seq);
        ordered
            .into_iter()
            .map(|(rid, stored)| ResourceSummary {
                rid: *rid,
                owner: stored.resource.owner.clone(),
                meta: stored.resource.meta.clone(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
