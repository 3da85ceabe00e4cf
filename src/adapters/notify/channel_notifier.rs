//! Channel notifier.
//!
//! Forwards `Notify` requests over a tokio mpsc channel to whatever task runs
//! the host's notify handling.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::{Notifier, Notify};

/// `Notifier` backed by a bounded channel.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    sender: mpsc::Sender<Notify>,
}

impl ChannelNotifier {
    pub fn new(sender: mpsc::Sender<Notify>) -> Self {
        Self { sender }
    }

    /// Notifier plus the receiving end, with room for `capacity` pending requests.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Notify>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self::new(sender), receiver)
    }
}

#[async_trait]
impl Notifier for ChannelNotifier {
    async fn notify(&self, request: Notify) -> Result<(), DomainError> {
        let token_hash = request.token.hash.clone();
        self.sender.send(request).await.map_err(|_| {
            DomainError::new(ErrorCode::NotificationFailed, "Notify channel closed")
                .with_detail("token_hash", token_hash)
        })
    }
}
