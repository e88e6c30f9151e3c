use std::collections::VecDeque;
use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Warning,
    Error,
}

/// A transient, user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: Level::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
        }
    }
}

/// Sink for notifications raised while a batch runs.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

impl Notifier for Sender<Notification> {
    fn notify(&self, notification: Notification) {
        if self.send(notification).is_err() {
            debug!("Notification receiver dropped");
        }
    }
}

/// Writes notifications to the log only.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            Level::Success => info!("{}", notification.message),
            Level::Warning => warn!("{}", notification.message),
            Level::Error => error!("{}", notification.message),
        }
    }
}

/// On-screen notifications, oldest first, each dropped after `ttl`.
pub struct Toasts {
    ttl: Duration,
    items: VecDeque<(Notification, Instant)>,
}

impl Toasts {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            items: VecDeque::new(),
        }
    }

    pub fn push(&mut self, notification: Notification, now: Instant) {
        self.items.push_back((notification, now + self.ttl));
    }

    pub fn prune(&mut self, now: Instant) {
        while matches!(self.items.front(), Some((_, expires)) if *expires <= now) {
            self.items.pop_front();
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter().map(|(notification, _)| notification)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
