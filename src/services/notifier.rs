use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{broadcast, watch};

use crate::api::ApiError;
use crate::models::Message;

const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
pub enum Notification {
    /// A failed request, worded for the user.
    Toast { description: String },
    /// A message unknown to the cache was fetched after a push.
    MessageArrived {
        conversation_uuid: String,
        message: Message,
    },
}

/// Outbound side of the inbox: transient toasts plus a message version
/// counter that renderers watch to know when cached messages changed.
#[derive(Clone)]
pub struct Notifier {
    tx: broadcast::Sender<Notification>,
    version: Arc<MessageVersion>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            tx,
            version: Arc::new(MessageVersion::new()),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }

    pub fn send(&self, notification: Notification) {
        // No subscribers is fine; nobody is looking.
        let _ = self.tx.send(notification);
    }

    pub fn error(&self, err: &ApiError) {
        tracing::warn!("{}", err);
        self.send(Notification::Toast {
            description: err.user_message(),
        });
    }

    pub fn version(&self) -> &MessageVersion {
        &self.version
    }
}

/// Coalesces message cache changes into one version bump per flush.
pub struct MessageVersion {
    pending: AtomicBool,
    tx: watch::Sender<u64>,
}

impl MessageVersion {
    fn new() -> Self {
        let (tx, _) = watch::channel(0);
        Self {
            pending: AtomicBool::new(false),
            tx,
        }
    }

    /// Mark the cache as changed; nothing is published until `flush`.
    pub fn touch(&self) {
        self.pending.store(true, Ordering::Release);
    }

    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Publish a single increment if anything changed since the last flush.
    pub fn flush(&self) -> Option<u64> {
        if !self.pending.swap(false, Ordering::AcqRel) {
            return None;
        }
        let mut next = 0;
        self.tx.send_modify(|v| {
            *v += 1;
            next = *v;
        });
        Some(next)
    }

    pub fn current(&self) -> u64 {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.tx.subscribe()
    }
}
