//! Logging notification surface

use async_trait::async_trait;
use pocket_core::{Notification, NotificationError, NotificationSurface};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::info;

#[derive(Default)]
struct Shown {
    current: Option<Notification>,
    history: Vec<Notification>,
    dismissals: usize,
}

/// `NotificationSurface` that writes to the log
///
/// Keeps the currently shown notification and every published one so hosts
/// without a notification shade (and tests) can inspect them.
#[derive(Clone, Default)]
pub struct LogSurface {
    shown: Arc<Mutex<Shown>>,
    failing: Arc<AtomicBool>,
}

impl LogSurface {
    /// Create an empty surface
    pub fn new() -> Self {
        Self::default()
    }

    fn shown(&self) -> MutexGuard<'_, Shown> {
        self.shown.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make every publish fail until reset
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Notification currently shown
    pub fn current(&self) -> Option<Notification> {
        self.shown().current.clone()
    }

    /// Every successfully published notification, oldest first
    pub fn history(&self) -> Vec<Notification> {
        self.shown().history.clone()
    }

    /// Number of dismissals
    pub fn dismissals(&self) -> usize {
        self.shown().dismissals
    }
}

#[async_trait]
impl NotificationSurface for LogSurface {
    async fn publish(&self, notification: Notification) -> Result<(), NotificationError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(NotificationError::Publish("surface unavailable".to_string()));
        }

        info!(
            token = %notification.token,
            "[notification] {} - {}",
            notification.title,
            notification.body
        );

        let mut shown = self.shown();
        shown.history.push(notification.clone());
        shown.current = Some(notification);
        Ok(())
    }

    async fn dismiss(&self) -> Result<(), NotificationError> {
        let mut shown = self.shown();
        if shown.current.take().is_some() {
            info!("[notification] dismissed");
        }
        shown.dismissals += 1;
        Ok(())
    }
}
