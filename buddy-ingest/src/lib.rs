//! buddy-ingest: bank notification parsing and the pending-notification inbox.

pub mod inbox;
pub mod parsers;
pub mod types;

pub use inbox::NotificationInbox;
pub use parsers::bank_notification::NotificationParser;
pub use types::{NotificationCapability, PendingNotification};
