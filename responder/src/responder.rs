use common::{
    port::{HostEnd, Outbound},
    Operation, Payload, Request, RequestId, Response,
};
use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::{Dataset, ResponderError, Timing};

/// Answers DB port requests from a [`Dataset`].
///
/// Every request is handled on its own: in [`Timing::Delayed`] mode each one
/// gets a timer task that always runs to completion. Nothing is cancelled and
/// nothing is retried.
#[derive(Clone, Debug)]
pub struct Responder {
    dataset: Dataset,
    timing: Timing,
}

impl Responder {
    pub fn new(dataset: Dataset, timing: Timing) -> Self {
        Responder { dataset, timing }
    }

    pub fn timing(&self) -> Timing {
        self.timing
    }

    /// Looks up the answer to `request`.
    ///
    /// `Ok(None)` means the lookup found nothing, e.g. a user id past the end
    /// of the dataset. No response is sent for it.
    pub fn answer(&self, request: &Request) -> Result<Option<Response>, ResponderError> {
        let payload = match request.operation() {
            Operation::GetUsers => Some(Payload::Users(self.dataset.all())),
            Operation::GetUser { user_id } => self
                .dataset
                .get(user_id)
                .map(|user| Payload::User(user.to_owned())),
            Operation::Unknown(operation) => {
                return Err(ResponderError::UnknownOperation {
                    request_id: request.request_id.clone(),
                    operation,
                })
            }
        };

        Ok(payload.map(|payload| Response {
            request_id: request.request_id.clone(),
            payload,
        }))
    }

    /// Decodes one port message and schedules its answer on `reply`.
    ///
    /// Unknown operations and undecodable messages are rejected here and
    /// never answered.
    pub fn handle(&self, value: Value, reply: &Outbound<Value>) -> Result<RequestId, ResponderError> {
        let request: Request = serde_json::from_value(value)?;
        let request_id = request.request_id.clone();
        info!(%request_id, port = reply.name(), "DB START");

        if let Operation::Unknown(operation) = request.operation() {
            return Err(ResponderError::UnknownOperation {
                request_id,
                operation,
            });
        }

        match self.timing {
            Timing::Immediate => self.emit(&request, reply)?,
            Timing::Delayed(delay) => {
                let responder = self.clone();
                let reply = reply.clone();
                tokio::spawn(async move {
                    sleep(delay).await;
                    if let Err(error) = responder.emit(&request, &reply) {
                        warn!(request_id = %request.request_id, %error, "could not answer request");
                    }
                });
            }
        }

        Ok(request_id)
    }

    fn emit(&self, request: &Request, reply: &Outbound<Value>) -> Result<(), ResponderError> {
        if let Some(response) = self.answer(request)? {
            reply.send(serde_json::to_value(&response)?)?;
            info!(request_id = %response.request_id, mode = self.timing.label(), "DB END");
        }
        Ok(())
    }

    fn dispatch(&self, value: Value, reply: &Outbound<Value>, port: &'static str) {
        if let Err(error) = self.handle(value, reply) {
            warn!(port, %error, "request left unanswered");
        }
    }

    pub async fn serve(self, host: HostEnd<Value>) {
        let HostEnd {
            mut requests,
            responses,
        } = host;
        let port = requests.name();
        info!(inbound = port, outbound = responses.name(), "responder listening");

        while let Some(value) = requests.recv().await {
            self.dispatch(value, &responses, port);
        }
        debug!(port, "inbound port closed");
    }

    /// Serves the users and data pairs side by side until both hang up.
    pub async fn serve_pairs(self, users: HostEnd<Value>, data: HostEnd<Value>) {
        let HostEnd {
            requests: mut users_rx,
            responses: users_tx,
        } = users;
        let HostEnd {
            requests: mut data_rx,
            responses: data_tx,
        } = data;
        let users_port = users_rx.name();
        let data_port = data_rx.name();
        info!(ports = ?[users_port, data_port], "responder listening");

        let (mut users_open, mut data_open) = (true, true);
        while users_open || data_open {
            tokio::select! {
                msg = users_rx.recv(), if users_open => match msg {
                    Some(value) => self.dispatch(value, &users_tx, users_port),
                    None => {
                        debug!(port = users_port, "inbound port closed");
                        users_open = false;
                    }
                },
                msg = data_rx.recv(), if data_open => match msg {
                    Some(value) => self.dispatch(value, &data_tx, data_port),
                    None => {
                        debug!(port = data_port, "inbound port closed");
                        data_open = false;
                    }
                },
            }
        }
    }
}

impl Default for Responder {
    fn default() -> Self {
        Responder::new(Dataset::mock(), Timing::default())
    }
}
