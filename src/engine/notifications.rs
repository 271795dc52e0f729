//! Transient toast messages with auto-dismiss.
//!
//! Each visible toast owns its dismiss timer. Evicting or dismissing a toast
//! aborts its timer, so a timer can only ever clear the toast it was started
//! for. Timers need a running tokio runtime; without one, toasts stay until
//! dismissed.

use crate::config::ClientConfig;
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::debug;

pub type NotificationId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub message: String,
}

struct Entry {
    notification: Notification,
    timer: Option<JoinHandle<()>>,
}

impl Entry {
    fn cancel(self) {
        if let Some(timer) = self.timer {
            timer.abort();
        }
    }
}

#[derive(Default)]
struct Inner {
    entries: VecDeque<Entry>,
    next_id: NotificationId,
}

/// Ordered toasts, oldest first, capped at `capacity`
pub struct NotificationQueue {
    inner: Arc<Mutex<Inner>>,
    duration: Duration,
    capacity: usize,
}

impl NotificationQueue {
    pub fn new(duration: Duration, capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            duration,
            capacity: capacity.max(1),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.notification_duration, config.notification_capacity)
    }

    pub fn success(&self, message: impl Into<String>) -> NotificationId {
        self.show(NotificationKind::Success, message)
    }

    pub fn error(&self, message: impl Into<String>) -> NotificationId {
        self.show(NotificationKind::Error, message)
    }

    pub fn info(&self, message: impl Into<String>) -> NotificationId {
        self.show(NotificationKind::Info, message)
    }

    /// Show a toast. When the queue is full the oldest toast is evicted and
    /// its timer cancelled.
    pub fn show(&self, kind: NotificationKind, message: impl Into<String>) -> NotificationId {
        let id = {
            let mut inner = self.inner.lock();
            inner.next_id += 1;
            inner.next_id
        };
        let timer = self.schedule_dismiss(id);

        let mut inner = self.inner.lock();
        while inner.entries.len() >= self.capacity {
            if let Some(evicted) = inner.entries.pop_front() {
                debug!("Replacing notification {}", evicted.notification.id);
                evicted.cancel();
            }
        }

        let notification = Notification {
            id,
            kind,
            message: message.into(),
        };
        debug!("Notification {} ({:?}): {}", id, kind, notification.message);
        inner.entries.push_back(Entry {
            notification,
            timer,
        });
        id
    }

    fn schedule_dismiss(&self, id: NotificationId) -> Option<JoinHandle<()>> {
        let handle = Handle::try_current().ok()?;
        let inner: Weak<Mutex<Inner>> = Arc::downgrade(&self.inner);
        let duration = self.duration;
        Some(handle.spawn(async move {
            tokio::time::sleep(duration).await;
            if let Some(inner) = inner.upgrade() {
                inner.lock().entries.retain(|e| e.notification.id != id);
            }
        }))
    }

    /// Clear every visible toast immediately
    pub fn dismiss(&self) {
        let mut inner = self.inner.lock();
        for entry in inner.entries.drain(..) {
            entry.cancel();
        }
    }

    /// Clear one toast; returns false if it was already gone
    pub fn dismiss_id(&self, id: NotificationId) -> bool {
        let mut inner = self.inner.lock();
        match inner.entries.iter().position(|e| e.notification.id == id) {
            Some(pos) => {
                if let Some(entry) = inner.entries.remove(pos) {
                    entry.cancel();
                }
                true
            }
            None => false,
        }
    }

    /// Most recent visible toast
    pub fn current(&self) -> Option<Notification> {
        self.inner
            .lock()
            .entries
            .back()
            .map(|e| e.notification.clone())
    }

    pub fn visible(&self) -> Vec<Notification> {
        self.inner
            .lock()
            .entries
            .iter()
            .map(|e| e.notification.clone())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().entries.is_empty()
    }
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::from_config(&ClientConfig::default())
    }
}

impl Drop for NotificationQueue {
    fn drop(&mut self) {
        self.dismiss();
    }
}
