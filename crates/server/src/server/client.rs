//! Client session state.

use protocol::PlayerId;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;

/// A frame queued for a connection's writer.
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    /// Serialized JSON message. Broadcasts share one allocation.
    Text(Arc<str>),
    /// Ask the writer to send a close frame and stop.
    Close,
}

/// A connected client session.
#[derive(Debug)]
pub struct Client {
    /// Id of the player this connection controls.
    pub id: PlayerId,
    /// Remote address, when the transport knows it.
    pub addr: Option<SocketAddr>,
    /// Connection time.
    pub connected_at: std::time::Instant,
    tx: mpsc::UnboundedSender<Outbound>,
}

impl Client {
    /// Create a client session and the receiving end of its outbound queue.
    pub fn new(id: PlayerId, addr: Option<SocketAddr>) -> (Self, mpsc::UnboundedReceiver<Outbound>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let client = Self {
            id,
            addr,
            connected_at: std::time::Instant::now(),
            tx,
        };
        (client, rx)
    }

    /// Whether the connection's writer is still receiving.
    #[inline]
    pub fn is_open(&self) -> bool {
        !self.tx.is_closed()
    }

    /// Queue a frame. Frames for closed connections are dropped.
    pub fn send(&self, frame: Outbound) -> bool {
        self.is_open() && self.tx.send(frame).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_after_receiver_dropped_is_skipped() {
        let (client, rx) = Client::new(PlayerId::nil(), None);
        assert!(client.is_open());
        assert!(client.send(Outbound::Text("{}".into())));

        drop(rx);
        assert!(!client.is_open());
        assert!(!client.send(Outbound::Close));
    }
}
