//! Typed message channel between contexts
//!
//! Replaces the browser's runtime messaging. A [`Port`] is the sending end
//! and can be cloned freely; an [`Inbox`] is owned by exactly one listener.
//! Plain sends are fire-and-forget; requests carry a one-shot reply slot.

use crate::models::{Message, RepoInfo};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

#[derive(Debug, Error)]
pub enum MessagingError {
    /// The listening context is gone.
    #[error("No listener for '{0}' message")]
    Disconnected(&'static str),

    /// The listener dropped the request without replying.
    #[error("Listener did not answer '{0}' message")]
    NoResponse(&'static str),
}

/// Who sent a message
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MessageSender {
    /// Set when the message comes from a page script
    pub tab_id: Option<i64>,
}

impl MessageSender {
    pub fn tab(tab_id: i64) -> Self {
        Self { tab_id: Some(tab_id) }
    }

    /// A sender outside any tab, such as the popup
    pub fn extension() -> Self {
        Self { tab_id: None }
    }
}

/// A delivered message plus the means to answer it
#[derive(Debug)]
pub struct Envelope {
    pub message: Message,
    pub sender: MessageSender,
    reply: Option<oneshot::Sender<RepoInfo>>,
}

impl Envelope {
    pub fn expects_response(&self) -> bool {
        self.reply.is_some()
    }

    /// Answer the request. Returns `false` when nobody is waiting anymore.
    pub fn respond(self, info: RepoInfo) -> bool {
        match self.reply {
            Some(reply) => reply.send(info).is_ok(),
            None => false,
        }
    }
}

/// Sending end of a channel
#[derive(Debug, Clone)]
pub struct Port {
    tx: mpsc::UnboundedSender<Envelope>,
}

/// Receiving end of a channel
#[derive(Debug)]
pub struct Inbox {
    rx: mpsc::UnboundedReceiver<Envelope>,
}

/// Create a connected port/inbox pair
pub fn channel() -> (Port, Inbox) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Port { tx }, Inbox { rx })
}

impl Port {
    /// Deliver without waiting for any answer
    pub fn send(&self, message: Message, sender: MessageSender) -> Result<(), MessagingError> {
        let action = message.action();
        self.tx
            .send(Envelope {
                message,
                sender,
                reply: None,
            })
            .map_err(|_| MessagingError::Disconnected(action))
    }

    /// Deliver and wait for the listener's reply
    pub async fn request(&self, message: Message, sender: MessageSender) -> Result<RepoInfo, MessagingError> {
        let action = message.action();
        let (reply_tx, reply_rx) = oneshot::channel();

        self.tx
            .send(Envelope {
                message,
                sender,
                reply: Some(reply_tx),
            })
            .map_err(|_| MessagingError::Disconnected(action))?;

        reply_rx.await.map_err(|_| MessagingError::NoResponse(action))
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl Inbox {
    /// Next message, or `None` once every port is dropped
    pub async fn recv(&mut self) -> Option<Envelope> {
        self.rx.recv().await
    }
}
