/// Server-to-client push channels
///
/// Every session owns one channel. Writers push events without waiting; at
/// most one subscriber drains them as a stream at a time. Once a channel is
/// closed every push is refused with `ChannelError::Closed`, which callers
/// log and drop.

use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll};

use futures::stream::{BoxStream, Stream, StreamExt};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

/// Events buffered per channel before pushes start failing
pub const CHANNEL_CAPACITY: usize = 256;

/// One event delivered to a subscriber
#[derive(Debug, Clone, PartialEq)]
pub enum PushEvent {
    /// Legacy handshake: where the client must POST its messages
    Endpoint(String),
    /// A JSON-RPC message for the client
    Message(Value),
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelError {
    #[error("channel is closed")]
    Closed,

    #[error("channel buffer is full")]
    Full,

    #[error("channel already has a subscriber")]
    Busy,
}

/// Live connection used to push events to one client
pub trait SessionChannel: Send + Sync {
    fn push(&self, event: PushEvent) -> Result<(), ChannelError>;

    /// Take the read side. Fails with `Busy` while another subscriber holds it.
    fn subscribe(self: Arc<Self>) -> Result<BoxStream<'static, PushEvent>, ChannelError>;

    /// Stop accepting writes and end the current subscription
    fn close(&self);

    fn is_closed(&self) -> bool;

    /// Whether a subscriber currently holds the read side
    fn is_subscribed(&self) -> bool {
        false
    }
}

/// Bounded in-memory channel backed by `tokio::sync::mpsc`
#[derive(Debug)]
pub struct PushChannel {
    sender: Mutex<Option<mpsc::Sender<PushEvent>>>,
    receiver: Mutex<Option<mpsc::Receiver<PushEvent>>>,
}

impl PushChannel {
    pub fn new() -> Self {
        Self::with_capacity(CHANNEL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, receiver) = mpsc::channel(capacity);
        Self {
            sender: Mutex::new(Some(sender)),
            receiver: Mutex::new(Some(receiver)),
        }
    }

    fn sender(&self) -> Option<mpsc::Sender<PushEvent>> {
        self.sender.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Default for PushChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionChannel for PushChannel {
    fn push(&self, event: PushEvent) -> Result<(), ChannelError> {
        let sender = self.sender().ok_or(ChannelError::Closed)?;
        sender.try_send(event).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => ChannelError::Full,
            mpsc::error::TrySendError::Closed(_) => ChannelError::Closed,
        })
    }

    fn subscribe(self: Arc<Self>) -> Result<BoxStream<'static, PushEvent>, ChannelError> {
        if self.is_closed() {
            return Err(ChannelError::Closed);
        }
        let receiver = self
            .receiver
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .ok_or(ChannelError::Busy)?;

        Ok(Box::pin(Subscription {
            events: Some(ReceiverStream::new(receiver)),
            channel: self,
        }))
    }

    fn close(&self) {
        // Dropping the sender ends the subscriber's stream once it drains
        self.sender.lock().unwrap_or_else(PoisonError::into_inner).take();
    }

    fn is_closed(&self) -> bool {
        self.sender.lock().unwrap_or_else(PoisonError::into_inner).is_none()
    }

    fn is_subscribed(&self) -> bool {
        !self.is_closed() && self.receiver.lock().unwrap_or_else(PoisonError::into_inner).is_none()
    }
}

/// Read side of a `PushChannel`; hands the receiver back when dropped
struct Subscription {
    events: Option<ReceiverStream<PushEvent>>,
    channel: Arc<PushChannel>,
}

impl Stream for Subscription {
    type Item = PushEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        match self.events.as_mut() {
            Some(events) => events.poll_next_unpin(cx),
            None => Poll::Ready(None),
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(events) = self.events.take() {
            if !self.channel.is_closed() {
                *self.channel.receiver.lock().unwrap_or_else(PoisonError::into_inner) = Some(events.into_inner());
            }
        }
    }
}
