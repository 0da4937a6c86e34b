//! Notification parsers. One module per message family.

pub mod bank_notification;
