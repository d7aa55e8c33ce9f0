// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-agent mailbox queues.
//!
//! Every receiver identity owns one FIFO mailbox, created lazily on first
//! `send` or `poll`. Delivery is at-most-once: `poll` removes the message,
//! and nothing is redelivered if the caller fails afterwards.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};

use crate::error::HubError;

/// A control message routed between agents.
///
/// `payload` is never interpreted by the broker; by convention it carries a
/// registry pointer rather than the content itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub sender: String,
    pub receiver: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub payload: serde_json::Value,
    #[serde(alias = "conv_id")]
    pub conversation_id: String,
}

impl Message {
    pub fn new(
        sender: impl Into<String>,
        receiver: impl Into<String>,
        kind: impl Into<String>,
        payload: serde_json::Value,
        conversation_id: impl Into<String>,
    ) -> Self {
        Self {
            sender: sender.into(),
            receiver: receiver.into(),
            kind: kind.into(),
            payload,
            conversation_id: conversation_id.into(),
        }
    }

    /// Reject messages without a usable sender or receiver identity.
    pub fn validate(&self) -> Result<(), HubError> {
        if self.sender.trim().is_empty() || self.receiver.trim().is_empty() {
            return Err(HubError::InvalidInput);
        }
        Ok(())
    }
}

/// Outcome of a poll. `Empty` is the steady state for an idle agent.
///
/// Decoded through [`PollEnvelope`] rather than a tagged-enum derive:
/// tagged enums buffer their input, which loses arbitrary-precision numbers
/// inside the payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case", try_from = "PollEnvelope")]
pub enum PollResult {
    Ok { message: Message },
    Empty,
}

/// Flat wire shape of [`PollResult`].
#[derive(Deserialize)]
struct PollEnvelope {
    status: String,
    #[serde(default)]
    message: Option<Message>,
}

impl TryFrom<PollEnvelope> for PollResult {
    type Error = String;

    fn try_from(value: PollEnvelope) -> Result<Self, Self::Error> {
        match (value.status.as_str(), value.message) {
            ("ok", Some(message)) => Ok(Self::Ok { message }),
            ("empty", None) => Ok(Self::Empty),
            (status, _) => Err(format!("unexpected poll result: {status}")),
        }
    }
}

impl From<Option<Message>> for PollResult {
    fn from(value: Option<Message>) -> Self {
        match value {
            Some(message) => Self::Ok { message },
            None => Self::Empty,
        }
    }
}

/// Queue depth for one identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailboxInfo {
    pub agent: String,
    pub size: usize,
}

type Mailbox = Arc<Mutex<VecDeque<Message>>>;

/// All mailboxes owned by one broker instance.
///
/// The map lock is held only long enough to find or insert a mailbox; each
/// mailbox has its own lock so traffic to different receivers never
/// contends. Mailboxes are never removed, so a handle obtained from the map
/// stays authoritative for that receiver.
#[derive(Default)]
pub struct Mailboxes {
    boxes: RwLock<HashMap<String, Mailbox>>,
}

impl Mailboxes {
    pub fn new() -> Self {
        Self::default()
    }

    fn mailbox(&self, receiver: &str) -> Mailbox {
        if let Some(mailbox) = self.boxes.read().get(receiver) {
            return Arc::clone(mailbox);
        }
        let mut boxes = self.boxes.write();
        Arc::clone(boxes.entry(receiver.to_owned()).or_default())
    }

    fn existing(&self, receiver: &str) -> Option<Mailbox> {
        self.boxes.read().get(receiver).map(Arc::clone)
    }

    /// Append `message` to its receiver's mailbox, returning the new depth.
    pub fn send(&self, message: Message) -> Result<usize, HubError> {
        message.validate()?;
        let mailbox = self.mailbox(&message.receiver);
        let mut queue = mailbox.lock();
        queue.push_back(message);
        Ok(queue.len())
    }

    /// Remove and return the oldest message queued for `receiver`.
    pub fn poll(&self, receiver: &str) -> Option<Message> {
        self.mailbox(receiver).lock().pop_front()
    }

    /// Number of messages waiting for `receiver`.
    pub fn size(&self, receiver: &str) -> usize {
        self.existing(receiver).map(|m| m.lock().len()).unwrap_or(0)
    }

    /// Snapshot of the queued messages for `receiver`, oldest first.
    pub fn peek(&self, receiver: &str) -> Vec<Message> {
        match self.existing(receiver) {
            Some(mailbox) => mailbox.lock().iter().cloned().collect(),
            None => Vec::new(),
        }
    }

    /// Drop everything queued for `receiver`. Returns how many were removed.
    pub fn purge(&self, receiver: &str) -> usize {
        match self.existing(receiver) {
            Some(mailbox) => {
                let mut queue = mailbox.lock();
                let purged = queue.len();
                queue.clear();
                purged
            }
            None => 0,
        }
    }

    /// Depth of every known mailbox, sorted by identity.
    pub fn list(&self) -> Vec<MailboxInfo> {
        let boxes = self.boxes.read();
        let mut list: Vec<MailboxInfo> = boxes
            .iter()
            .map(|(agent, mailbox)| MailboxInfo { agent: agent.clone(), size: mailbox.lock().len() })
            .collect();
        list.sort_by(|a, b| a.agent.cmp(&b.agent));
        list
    }

    /// `(mailbox count, total queued messages)`.
    pub fn stats(&self) -> (usize, usize) {
        let boxes = self.boxes.read();
        let queued = boxes.values().map(|m| m.lock().len()).sum();
        (boxes.len(), queued)
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
