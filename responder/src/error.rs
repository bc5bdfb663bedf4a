use common::{port::PortError, RequestId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResponderError {
    #[error("unknown operation `{operation}` for request {request_id}")]
    UnknownOperation {
        request_id: RequestId,
        operation: String,
    },
    #[error("invalid port message: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Port(#[from] PortError),
}
