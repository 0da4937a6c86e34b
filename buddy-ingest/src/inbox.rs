//! NotificationInbox: scanned notifications awaiting confirmation.
//!
//! Entries are kept newest-first. Confirming validates the draft and hands
//! the transaction back to the caller (who appends it to the ledger). The
//! entry stays, flagged, so the same message can't be confirmed twice. A draft
//! that fails validation leaves the entry pending. Rejecting drops it.

use anyhow::{bail, Result};
use buddy_core::NewTransaction;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::parsers::bank_notification::NotificationParser;
use crate::types::PendingNotification;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationInbox {
    entries: Vec<PendingNotification>,
}

impl NotificationInbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&PendingNotification> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn entries(&self) -> &[PendingNotification] {
        &self.entries
    }

    /// Parse each message and queue it. Blank messages are skipped.
    /// Returns how many of the queued messages carry a transaction.
    pub fn scan<I, S>(&mut self, parser: &NotificationParser, messages: I, received_on: NaiveDate) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut scanned: Vec<PendingNotification> = messages
            .into_iter()
            .filter(|m| !m.as_ref().trim().is_empty())
            .map(|m| {
                let content = m.as_ref().trim().to_string();
                PendingNotification {
                    id: Uuid::new_v4().to_string(),
                    draft: parser.parse(&content, received_on),
                    content,
                    received_on,
                    is_confirmed: false,
                }
            })
            .collect();

        let detected = scanned.iter().filter(|e| e.draft.is_some()).count();
        scanned.append(&mut self.entries);
        self.entries = scanned;
        detected
    }

    /// Unconfirmed entries, newest first.
    pub fn pending(&self) -> impl Iterator<Item = &PendingNotification> {
        self.entries.iter().filter(|e| !e.is_confirmed)
    }

    /// Validate an entry's draft, mark the entry confirmed, and return the
    /// transaction ready to append.
    pub fn confirm(&mut self, id: &str) -> Result<NewTransaction> {
        let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) else {
            bail!("no pending notification with id {id}");
        };
        if entry.is_confirmed {
            bail!("notification {id} was already confirmed");
        }
        let Some(draft) = entry.draft.clone() else {
            bail!("no transaction detected in notification {id}");
        };
        let txn = NewTransaction::from_draft(draft)?;
        entry.is_confirmed = true;
        Ok(txn)
    }

    pub fn reject(&mut self, id: &str) -> Option<PendingNotification> {
        let idx = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(idx))
    }
}
