// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resource identifiers and the `<scheme>://<kind>/<id>` pointer form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Registry-assigned identifier of a stored resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(Uuid);

impl ResourceId {
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Rejected id spelling. Only the lowercase hyphenated form the registry
/// issues is accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidResourceId(String);

impl fmt::Display for InvalidResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid resource id: {}", self.0)
    }
}

impl std::error::Error for InvalidResourceId {}

impl FromStr for ResourceId {
    type Err = InvalidResourceId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Uuid::parse_str(s) {
            Ok(uuid) if uuid.hyphenated().to_string() == s => Ok(Self(uuid)),
            _ => Err(InvalidResourceId(s.to_owned())),
        }
    }
}

/// Opaque handle to a resource. Agents pass it around whole; only the
/// registry looks inside.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Pointer {
    scheme: String,
    kind: String,
    id: ResourceId,
}

impl Pointer {
    pub fn new(scheme: impl Into<String>, kind: impl Into<String>, id: ResourceId) -> Self {
        Self { scheme: scheme.into(), kind: kind.into(), id }
    }

    /// Parse `<scheme>://<kind>/<id>`. Returns `None` for anything else.
    pub fn parse(raw: &str) -> Option<Self> {
        let (scheme, rest) = raw.split_once("://")?;
        let (kind, id) = rest.split_once('/')?;
        if scheme.is_empty() || kind.is_empty() || id.contains('/') {
            return None;
        }
        let id = id.parse().ok()?;
        Some(Self::new(scheme, kind, id))
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn id(&self) -> ResourceId {
        self.id
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}/{}", self.scheme, self.kind, self.id)
    }
}

impl From<Pointer> for String {
    fn from(value: Pointer) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for Pointer {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("malformed pointer: {value}"))
    }
}

#[cfg(test)]
#[path = "pointer_tests.rs"]
mod tests;
