use common::port::AppEnd;
use serde_json::Value;

/// App side of the `toJS` / `fromJS` pair. Echoes carry no id, so a caller
/// holds the link for a whole round trip and replies are matched by order.
#[derive(Debug)]
pub struct EchoLink {
    end: AppEnd<Value>,
    // sent but not yet received; survives a round trip that was cancelled
    in_flight: usize,
}

impl EchoLink {
    pub fn new(end: AppEnd<Value>) -> Self {
        EchoLink { end, in_flight: 0 }
    }

    /// Sends `value` to the host and returns its echo, or `None` once the
    /// host is gone. Replies owed to abandoned round trips are skipped.
    pub async fn round_trip(&mut self, value: Value) -> Option<String> {
        self.end.requests.send(value).ok()?;
        self.in_flight += 1;

        loop {
            let reply = self.end.responses.recv().await?;
            self.in_flight -= 1;
            if self.in_flight == 0 {
                return match reply {
                    Value::String(text) => Some(text),
                    other => Some(other.to_string()),
                };
            }
        }
    }
}
