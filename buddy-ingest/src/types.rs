use buddy_core::TransactionDraft;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Whether the host can read inbound notifications at all.
///
/// Parsing is gated on this instead of raising a capability error: an
/// unavailable host simply never detects a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationCapability {
    Available,
    Unavailable,
}

impl NotificationCapability {
    pub fn from_enabled(enabled: bool) -> Self {
        if enabled {
            NotificationCapability::Available
        } else {
            NotificationCapability::Unavailable
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, NotificationCapability::Available)
    }
}

/// A scanned notification awaiting the user's decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingNotification {
    pub id: String,
    pub content: String,
    /// None means no transaction was detected in `content`
    pub draft: Option<TransactionDraft>,
    pub received_on: NaiveDate,
    pub is_confirmed: bool,
}
