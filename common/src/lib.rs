use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Number;

pub mod port;

pub const GET_USERS: &str = "getUsers";
pub const GET_USER: &str = "getUser";

/// Correlation token copied verbatim from a request to its response.
#[derive(Eq, Hash, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    Number(Number),
    Text(String),
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestId::Number(n) => write!(f, "{n}"),
            RequestId::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for RequestId {
    fn from(id: &str) -> Self {
        RequestId::Text(id.to_owned())
    }
}

impl From<String> for RequestId {
    fn from(id: String) -> Self {
        RequestId::Text(id)
    }
}

impl From<i64> for RequestId {
    fn from(id: i64) -> Self {
        RequestId::Number(id.into())
    }
}

impl From<Number> for RequestId {
    fn from(id: Number) -> Self {
        RequestId::Number(id)
    }
}

/// What a request asks the host for.
///
/// On the wire this is either a bare tag (`"getUsers"`) or an object with a
/// `kind` and its arguments (`{"kind": "getUser", "userId": 3}`). Tags the
/// host does not understand survive decoding as [`Operation::Unknown`] so
/// they can be reported.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "OperationTag", into = "OperationTag")]
pub enum Operation {
    GetUsers,
    GetUser { user_id: i64 },
    Unknown(String),
}

impl Operation {
    pub fn from_tag(tag: impl Into<String>) -> Self {
        OperationTag::Bare(tag.into()).into()
    }

    pub fn tag(&self) -> &str {
        match self {
            Operation::GetUsers => GET_USERS,
            Operation::GetUser { .. } => GET_USER,
            Operation::Unknown(tag) => tag,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum OperationTag {
    Bare(String),
    Kind {
        kind: String,
        #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
        user_id: Option<i64>,
    },
}

impl From<OperationTag> for Operation {
    fn from(tag: OperationTag) -> Self {
        match tag {
            OperationTag::Bare(kind) | OperationTag::Kind { kind, user_id: None } => {
                if kind == GET_USERS {
                    Operation::GetUsers
                } else {
                    Operation::Unknown(kind)
                }
            }
            OperationTag::Kind {
                kind,
                user_id: Some(user_id),
            } => match kind.as_str() {
                GET_USER => Operation::GetUser { user_id },
                GET_USERS => Operation::GetUsers,
                _ => Operation::Unknown(kind),
            },
        }
    }
}

impl From<Operation> for OperationTag {
    fn from(operation: Operation) -> Self {
        match operation {
            Operation::GetUsers => OperationTag::Bare(GET_USERS.to_owned()),
            Operation::GetUser { user_id } => OperationTag::Kind {
                kind: GET_USER.to_owned(),
                user_id: Some(user_id),
            },
            Operation::Unknown(tag) => OperationTag::Bare(tag),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub request_id: RequestId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<Operation>,
}

impl Request {
    pub fn new(request_id: impl Into<RequestId>, operation: Option<Operation>) -> Self {
        Request {
            request_id: request_id.into(),
            operation,
        }
    }

    /// The requested operation. Requests without one ask for every user.
    pub fn operation(&self) -> Operation {
        self.operation.clone().unwrap_or(Operation::GetUsers)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub request_id: RequestId,
    #[serde(flatten)]
    pub payload: Payload,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Payload {
    Users(Vec<String>),
    User(String),
}
