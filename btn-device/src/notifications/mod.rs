//! Notifications
//!
//! Delivery goes through the [`Notifier`] seam so the platform push service
//! stays outside this crate. Every delivered notification is also kept in
//! `notificationHistory`, newest first, capped at [`HISTORY_CAP`].
//!
//! - [`NotificationCenter`] - deliver and record
//! - [`TracingNotifier`] - default notifier, writes to the log
//! - [`DailyReminder`] - the lunch and dinner recommendation reminders

pub mod reminders;

pub use reminders::{DAILY_REMINDERS, DailyReminder, next_reminder};

use crate::store::{DeviceStore, StoreKey, StoreResult};
use shared::models::Notification;
use std::sync::Arc;
use thiserror::Error;

/// Maximum entries kept in `notificationHistory`
pub const HISTORY_CAP: usize = 50;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Notification permission not granted")]
    PermissionDenied,

    #[error("Notification delivery failed: {0}")]
    Delivery(String),
}

/// Platform notification sink
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Notifier that only logs
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        tracing::info!(
            id = %notification.id,
            kind = ?notification.kind,
            table_id = ?notification.table_id,
            title = %notification.title,
            "Notification"
        );
        Ok(())
    }
}

/// Delivers notifications and keeps the history list
#[derive(Clone)]
pub struct NotificationCenter {
    store: DeviceStore,
    notifier: Arc<dyn Notifier>,
}

impl std::fmt::Debug for NotificationCenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationCenter").finish_non_exhaustive()
    }
}

impl NotificationCenter {
    pub fn new(store: DeviceStore, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    /// Fire-and-forget delivery
    ///
    /// Neither a notifier failure nor a history write failure reaches the
    /// caller; both are logged.
    pub fn deliver(&self, notification: Notification) {
        if let Err(e) = self.notifier.notify(&notification) {
            tracing::warn!(
                id = %notification.id,
                kind = ?notification.kind,
                error = %e,
                "Notification delivery failed"
            );
        }

        if let Err(e) = self.record(notification) {
            tracing::error!(error = %e, "Failed to save notification history");
        }
    }

    fn record(&self, notification: Notification) -> StoreResult<()> {
        self.store
            .update_list(StoreKey::NotificationHistory, |history: &mut Vec<Notification>| {
                history.insert(0, notification);
                history.truncate(HISTORY_CAP);
            })
    }

    /// Recorded notifications, newest first
    pub fn history(&self) -> StoreResult<Vec<Notification>> {
        self.store.get_list(StoreKey::NotificationHistory)
    }

    pub fn clear_history(&self) -> StoreResult<()> {
        self.store.remove(StoreKey::NotificationHistory)
    }
}
