use std::{collections::HashMap, time::Duration};

use common::{
    port::{Inbound, Outbound},
    Request, RequestId, Response,
};
use serde_json::Value;
use tokio::{
    sync::{mpsc, oneshot},
    time::sleep,
};
use tracing::{debug, error, warn};

#[derive(Debug)]
pub enum SyncMessage {
    Request(Request, oneshot::Sender<Reply>),
    Response(Response),
    Timeout(RequestId),
}

#[derive(Debug, PartialEq, Eq)]
pub enum Reply {
    Ok(Response),
    Timeout,
    Closed,
}

/// Sends `request` through the correlator and waits for its response, or for
/// `timeout` to pass.
pub async fn call(request: Request, sync_tx: mpsc::Sender<SyncMessage>, timeout: Duration) -> Reply {
    let (tx, rx) = oneshot::channel::<Reply>();
    let request_id = request.request_id.clone();

    if let Err(e) = sync_tx.send(SyncMessage::Request(request, tx)).await {
        error!(%request_id, "correlator is gone: {e}");
        return Reply::Closed;
    }

    tokio::spawn(async move {
        sleep(timeout).await;
        if sync_tx.send(SyncMessage::Timeout(request_id)).await.is_err() {
            debug!("correlator closed before timeout fired");
        }
    });

    rx.await.unwrap_or(Reply::Closed)
}

/// Owns the pending requests. Forwards each new request on `requests` and
/// completes it when its response or its timeout arrives, whichever is first.
pub async fn run(mut sync_rx: mpsc::Receiver<SyncMessage>, requests: Outbound<Value>) {
    let mut pending = HashMap::<RequestId, oneshot::Sender<Reply>>::new();

    loop {
        match sync_rx.recv().await {
            Some(msg) => match msg {
                SyncMessage::Request(request, reply_tx) => {
                    let request_id = request.request_id.clone();
                    let sent = serde_json::to_value(&request)
                        .map_err(|e| e.to_string())
                        .and_then(|value| requests.send(value).map_err(|e| e.to_string()));
                    match sent {
                        Ok(()) => {
                            pending.insert(request_id, reply_tx);
                        }
                        Err(e) => {
                            error!(%request_id, port = requests.name(), "failed to send request: {e}");
                            let _ = reply_tx.send(Reply::Closed);
                        }
                    }
                }
                SyncMessage::Response(res) => {
                    let request_id = res.request_id.clone();
                    match pending.remove(&request_id) {
                        Some(reply_tx) => {
                            if reply_tx.send(Reply::Ok(res)).is_err() {
                                warn!(%request_id, "caller went away before its response");
                            }
                        }
                        None => warn!(%request_id, "response for a request that is not pending"),
                    }
                }
                SyncMessage::Timeout(request_id) => {
                    if let Some(reply_tx) = pending.remove(&request_id) {
                        warn!(%request_id, "request timed out");
                        let _ = reply_tx.send(Reply::Timeout);
                    }
                }
            },
            None => {
                debug!(pending = pending.len(), "sync channel closed");
                return;
            }
        }
    }
}

/// Decodes everything the host answers with and hands it to the correlator.
pub async fn pump_responses(mut responses: Inbound<Value>, sync_tx: mpsc::Sender<SyncMessage>) {
    while let Some(value) = responses.recv().await {
        match serde_json::from_value::<Response>(value) {
            Ok(res) => {
                if sync_tx.send(SyncMessage::Response(res)).await.is_err() {
                    debug!("correlator closed, dropping responses");
                    return;
                }
            }
            Err(e) => warn!(port = responses.name(), "undecodable response: {e}"),
        }
    }
}
