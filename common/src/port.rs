//! Named message pipes between the app and its host.
//!
//! A port is one direction of travel. The app sends requests on an inbound
//! port and the host answers on the matching outbound one; [`ChannelPair`]
//! names the pairs the app knows about.

use thiserror::Error;
use tokio::sync::mpsc;

pub const GET_DB_USERS: &str = "getDbUsers";
pub const GOT_DB_USERS: &str = "gotDbUsers";
pub const GET_DB_DATA: &str = "getDbData";
pub const GOT_DB_DATA: &str = "gotDbData";
pub const TO_JS: &str = "toJS";
pub const FROM_JS: &str = "fromJS";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PortError {
    #[error("port `{0}` is closed")]
    Closed(&'static str),
}

pub fn port<T>(name: &'static str) -> (Outbound<T>, Inbound<T>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Outbound { name, tx }, Inbound { name, rx })
}

#[derive(Debug)]
pub struct Outbound<T> {
    name: &'static str,
    tx: mpsc::UnboundedSender<T>,
}

impl<T> Clone for Outbound<T> {
    fn clone(&self) -> Self {
        Outbound {
            name: self.name,
            tx: self.tx.clone(),
        }
    }
}

impl<T> Outbound<T> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn send(&self, value: T) -> Result<(), PortError> {
        self.tx.send(value).map_err(|_| PortError::Closed(self.name))
    }
}

#[derive(Debug)]
pub struct Inbound<T> {
    name: &'static str,
    rx: mpsc::UnboundedReceiver<T>,
}

impl<T> Inbound<T> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Next message, or `None` once every sender is gone.
    pub async fn recv(&mut self) -> Option<T> {
        self.rx.recv().await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelPair {
    /// `getDbUsers` / `gotDbUsers`
    Users,
    /// `getDbData` / `gotDbData`
    Data,
    /// `toJS` / `fromJS`
    Echo,
}

impl ChannelPair {
    pub fn inbound(self) -> &'static str {
        match self {
            ChannelPair::Users => GET_DB_USERS,
            ChannelPair::Data => GET_DB_DATA,
            ChannelPair::Echo => TO_JS,
        }
    }

    pub fn outbound(self) -> &'static str {
        match self {
            ChannelPair::Users => GOT_DB_USERS,
            ChannelPair::Data => GOT_DB_DATA,
            ChannelPair::Echo => FROM_JS,
        }
    }

    pub fn open<T>(self) -> Duplex<T> {
        let (requests_tx, requests_rx) = port(self.inbound());
        let (responses_tx, responses_rx) = port(self.outbound());
        Duplex {
            app: AppEnd {
                requests: requests_tx,
                responses: responses_rx,
            },
            host: HostEnd {
                requests: requests_rx,
                responses: responses_tx,
            },
        }
    }
}

/// Both ends of an opened [`ChannelPair`].
#[derive(Debug)]
pub struct Duplex<T> {
    pub app: AppEnd<T>,
    pub host: HostEnd<T>,
}

#[derive(Debug)]
pub struct AppEnd<T> {
    pub requests: Outbound<T>,
    pub responses: Inbound<T>,
}

#[derive(Debug)]
pub struct HostEnd<T> {
    pub requests: Inbound<T>,
    pub responses: Outbound<T>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn pair_carries_messages_both_ways() {
        let Duplex { app, mut host } = ChannelPair::Data.open::<u32>();
        let mut responses = app.responses;

        app.requests.send(1).unwrap();
        assert_eq!(host.requests.recv().await, Some(1));
        assert_eq!(host.requests.name(), GET_DB_DATA);

        host.responses.send(2).unwrap();
        assert_eq!(responses.recv().await, Some(2));
        assert_eq!(responses.name(), GOT_DB_DATA);
    }

    #[tokio::test]
    async fn send_fails_once_receiver_is_dropped() {
        let (tx, rx) = port::<u32>(GOT_DB_USERS);
        drop(rx);
        assert_eq!(tx.send(1), Err(PortError::Closed(GOT_DB_USERS)));
    }

    #[tokio::test]
    async fn recv_ends_when_senders_are_gone() {
        let (tx, mut rx) = port::<u32>(TO_JS);
        let other = tx.clone();
        drop(tx);
        other.send(5).unwrap();
        drop(other);
        assert_eq!(rx.recv().await, Some(5));
        assert_eq!(rx.recv().await, None);
    }
}
