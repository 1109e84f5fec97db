//! The kernel's single ordered inbox

use crate::message::KernelEvent;
use std::sync::mpsc;
use std::time::Duration;
use thiserror::Error;

/// Every sender of the inbox has been dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Event channel closed")]
pub struct ChannelClosed;

/// Creates the kernel inbox
///
/// The sending half can be cloned freely (timer, actors on any thread);
/// the receiving half is owned by the kernel run loop.
pub fn event_channel() -> (EventSender, EventInbox) {
    let (tx, rx) = mpsc::channel();
    (EventSender { inner: tx }, EventInbox { inner: rx })
}

/// Sending end of the kernel inbox
#[derive(Debug, Clone)]
pub struct EventSender {
    inner: mpsc::Sender<KernelEvent>,
}

impl EventSender {
    /// Enqueues an event behind everything already sent
    pub fn send(&self, event: KernelEvent) -> Result<(), ChannelClosed> {
        self.inner.send(event).map_err(|_| ChannelClosed)
    }
}

/// Receiving end of the kernel inbox
#[derive(Debug)]
pub struct EventInbox {
    inner: mpsc::Receiver<KernelEvent>,
}

impl EventInbox {
    /// Blocks until the next event arrives
    pub fn recv(&self) -> Result<KernelEvent, ChannelClosed> {
        self.inner.recv().map_err(|_| ChannelClosed)
    }

    /// Blocks for at most `timeout`
    ///
    /// Returns `Ok(None)` when the timeout elapses with nothing queued.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<KernelEvent>, ChannelClosed> {
        match self.inner.recv_timeout(timeout) {
            Ok(event) => Ok(Some(event)),
            Err(mpsc::RecvTimeoutError::Timeout) => Ok(None),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(ChannelClosed),
        }
    }

    /// Returns the next queued event without blocking
    pub fn try_recv(&self) -> Option<KernelEvent> {
        self.inner.try_recv().ok()
    }
}
