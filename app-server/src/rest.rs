use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use common::{Operation, Request, RequestId};
use serde_json::Value;
use tokio::sync::{mpsc, Mutex};
use tracing::info;
use uuid::Uuid;

use crate::{
    echo::EchoLink,
    sync::{self, Reply, SyncMessage},
};

#[derive(Clone)]
pub struct AppState {
    pub sync_tx: mpsc::Sender<SyncMessage>,
    pub echo: Arc<Mutex<EchoLink>>,
    pub timeout: Duration,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/users", get(users))
        .route("/users/:id", get(user))
        .route("/ops/:tag", get(operation))
        .route("/echo", post(echo))
        .layer(Extension(state))
}

pub async fn run(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    info!(%addr, "listening");

    axum::Server::bind(&addr)
        .serve(router(state).into_make_service())
        .await?;
    Ok(())
}

async fn users(Extension(state): Extension<AppState>) -> Response {
    fetch(&state, Operation::GetUsers).await
}

async fn user(Path(user_id): Path<i64>, Extension(state): Extension<AppState>) -> Response {
    fetch(&state, Operation::GetUser { user_id }).await
}

async fn operation(Path(tag): Path<String>, Extension(state): Extension<AppState>) -> Response {
    fetch(&state, Operation::from_tag(tag)).await
}

async fn fetch(state: &AppState, operation: Operation) -> Response {
    let request_id = RequestId::from(Uuid::new_v4().to_string());
    info!(%request_id, operation = operation.tag(), "asking host");
    let request = Request::new(request_id, Some(operation));

    match sync::call(request, state.sync_tx.clone(), state.timeout).await {
        Reply::Ok(res) => Json(res).into_response(),
        Reply::Timeout => (StatusCode::GATEWAY_TIMEOUT, "host did not answer").into_response(),
        Reply::Closed => (StatusCode::SERVICE_UNAVAILABLE, "host is unavailable").into_response(),
    }
}

async fn echo(Extension(state): Extension<AppState>, body: String) -> Response {
    let mut link = state.echo.lock().await;
    match tokio::time::timeout(state.timeout, link.round_trip(Value::String(body))).await {
        Ok(Some(text)) => text.into_response(),
        Ok(None) => (StatusCode::SERVICE_UNAVAILABLE, "host is unavailable").into_response(),
        Err(_) => (StatusCode::GATEWAY_TIMEOUT, "host did not answer").into_response(),
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{Body, Bytes},
        http::Request as HttpRequest,
    };
    use common::port::ChannelPair;
    use responder::{serve_echo, Dataset, Responder, Timing, MOCK_USERS};
    use tower::util::ServiceExt;

    use super::*;

    const TIMEOUT: Duration = Duration::from_millis(200);

    fn live_state() -> AppState {
        let data = ChannelPair::Data.open::<Value>();
        let echo = ChannelPair::Echo.open::<Value>();
        tokio::spawn(Responder::new(Dataset::mock(), Timing::Immediate).serve(data.host));
        tokio::spawn(serve_echo(echo.host));

        let (sync_tx, sync_rx) = mpsc::channel(16);
        tokio::spawn(sync::run(sync_rx, data.app.requests));
        tokio::spawn(sync::pump_responses(data.app.responses, sync_tx.clone()));

        AppState {
            sync_tx,
            echo: Arc::new(Mutex::new(EchoLink::new(echo.app))),
            timeout: TIMEOUT,
        }
    }

    fn dead_state() -> AppState {
        let echo = ChannelPair::Echo.open::<Value>();
        drop(echo.host);
        let (sync_tx, sync_rx) = mpsc::channel(1);
        drop(sync_rx);

        AppState {
            sync_tx,
            echo: Arc::new(Mutex::new(EchoLink::new(echo.app))),
            timeout: TIMEOUT,
        }
    }

    fn get_request(uri: &str) -> HttpRequest<Body> {
        HttpRequest::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn echo_request(body: &'static str) -> HttpRequest<Body> {
        HttpRequest::builder()
            .method("POST")
            .uri("/echo")
            .body(Body::from(body))
            .unwrap()
    }

    async fn send(state: AppState, request: HttpRequest<Body>) -> (StatusCode, Bytes) {
        let response = router(state).oneshot(request).await.unwrap();
        let status = response.status();
        let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
        (status, body)
    }

    fn json(body: &Bytes) -> Value {
        serde_json::from_slice(body).unwrap()
    }

    #[tokio::test]
    async fn users_route_returns_the_dataset() {
        let (status, body) = send(live_state(), get_request("/users")).await;

        assert_eq!(status, StatusCode::OK);
        let body = json(&body);
        assert!(body["requestId"].is_string());
        assert_eq!(body["users"], serde_json::json!(MOCK_USERS));
    }

    #[tokio::test]
    async fn user_route_returns_one_name() {
        let (status, body) = send(live_state(), get_request("/users/3")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body)["user"], "Robert Johnson");
    }

    #[tokio::test]
    async fn missing_user_times_out() {
        let (status, _) = send(live_state(), get_request("/users/9")).await;

        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    }

    #[tokio::test]
    async fn ops_route_passes_the_tag_through() {
        let (status, body) = send(live_state(), get_request("/ops/getUsers")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body)["users"].as_array().map(Vec::len), Some(6));

        let (status, _) = send(live_state(), get_request("/ops/purge")).await;
        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    }

    #[tokio::test]
    async fn closed_correlator_is_unavailable() {
        let (status, _) = send(dead_state(), get_request("/users")).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn echo_route_returns_the_host_text() {
        let (status, body) = send(live_state(), echo_request("hi")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(&body[..], b"Echo from host: hi");
    }

    #[tokio::test]
    async fn echo_without_host_is_unavailable() {
        let (status, _) = send(dead_state(), echo_request("hi")).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }
}
