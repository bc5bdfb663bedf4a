//! Mock database host for the app's DB ports.
//!
//! Requests arrive as JSON on `getDbUsers` / `getDbData` and are answered
//! from a fixed list of names on `gotDbUsers` / `gotDbData`, after a timer
//! per request. `toJS` is echoed straight back on `fromJS`.

mod dataset;
mod echo;
mod error;
mod responder;
mod timing;

pub use dataset::{Dataset, MOCK_USERS};
pub use echo::{echo, serve_echo};
pub use error::ResponderError;
pub use responder::Responder;
pub use timing::{Timing, DEFAULT_DELAY};
