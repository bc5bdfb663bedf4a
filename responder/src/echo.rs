use common::port::HostEnd;
use serde_json::Value;
use tracing::{debug, info, warn};

/// Formats the host's echo of an app value. Strings are echoed bare,
/// anything else as compact JSON.
pub fn echo(value: &Value) -> String {
    match value {
        Value::String(text) => format!("Echo from host: {text}"),
        other => format!("Echo from host: {other}"),
    }
}

/// Echoes every `toJS` value straight back on `fromJS`.
pub async fn serve_echo(host: HostEnd<Value>) {
    let HostEnd {
        mut requests,
        responses,
    } = host;
    info!(inbound = requests.name(), outbound = responses.name(), "echo listening");

    while let Some(value) = requests.recv().await {
        debug!(%value, "echo received");
        if let Err(error) = responses.send(Value::String(echo(&value))) {
            warn!(%error, "echo dropped");
        }
    }
}
