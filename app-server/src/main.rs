use std::sync::Arc;

use clap::Parser;
use common::port::ChannelPair;
use responder::{serve_echo, Dataset, Responder};
use serde_json::Value;
use tokio::sync::{mpsc, Mutex};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    config::{Channel, Config},
    echo::EchoLink,
    rest::AppState,
    sync::SyncMessage,
};

mod config;
mod echo;
mod rest;
mod sync;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if config.verbose { "debug" } else { "info" }));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let users = ChannelPair::Users.open::<Value>();
    let data = ChannelPair::Data.open::<Value>();
    let echo = ChannelPair::Echo.open::<Value>();

    let responder = Responder::new(Dataset::mock(), config.timing.into());
    info!(timing = responder.timing().label(), channel = ?config.channel, "starting host");
    tokio::spawn(responder.serve_pairs(users.host, data.host));
    tokio::spawn(serve_echo(echo.host));

    let (app, idle) = match config.channel {
        Channel::Users => (users.app, data.app),
        Channel::Data => (data.app, users.app),
    };
    // closes the unused pair on the host side
    drop(idle);

    let (sync_tx, sync_rx) = mpsc::channel::<SyncMessage>(100);
    tokio::spawn(sync::run(sync_rx, app.requests));
    tokio::spawn(sync::pump_responses(app.responses, sync_tx.clone()));

    let state = AppState {
        sync_tx,
        echo: Arc::new(Mutex::new(EchoLink::new(echo.app))),
        timeout: config.timeout(),
    };
    rest::run(config.addr(), state).await
}
