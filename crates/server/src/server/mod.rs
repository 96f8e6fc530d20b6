//! Game server implementation.
//!
//! HTTP routing, the WebSocket connection loop and process shutdown. All
//! game logic lives behind [`game`].

use crate::config::Config;
use crate::entity::PlayerName;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{ConnectInfo, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tracing::{debug, info, warn};

pub mod client;
pub mod game;

pub use client::{Client, Outbound};
pub use game::{GameState, SharedGame};

/// Query string of the upgrade request.
#[derive(Debug, Deserialize)]
struct JoinQuery {
    username: Option<String>,
}

/// Run the game server until SIGINT or SIGTERM.
///
/// Failing to bind is the only error this returns.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.bind, config.server.port).parse()?;
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on ws://{}", addr);

    let state = GameState::new(&config).into_shared();
    serve(listener, state, shutdown_signal()).await
}

/// Serve on an already-bound listener until `shutdown` resolves, then close
/// every connection and cancel the spawn timer.
pub async fn serve(
    listener: TcpListener,
    state: SharedGame,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let app = router(state.clone());
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        shutdown.await;
        game::shutdown(&state).await;
    })
    .await?;

    info!("Server stopped");
    Ok(())
}

/// Build the HTTP router.
pub fn router(state: SharedGame) -> Router {
    Router::new()
        .route("/", get(ws_handler))
        .route("/healthz", get(healthz))
        .layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
        .with_state(state)
}

async fn healthz() -> impl IntoResponse {
    Json(serde_json::json!({ "ok": true }))
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Query(query): Query<JoinQuery>,
    State(state): State<SharedGame>,
) -> Response {
    let max_len = state.read().await.config.server.max_name_length;
    let Some(name) = query
        .username
        .as_deref()
        .and_then(|raw| PlayerName::parse(raw, max_len))
    else {
        warn!("Connection rejected (missing or empty username): {}", addr);
        return (StatusCode::BAD_REQUEST, "username is required").into_response();
    };

    ws.on_upgrade(move |socket| handle_connection(socket, addr, state, name))
}

/// Handle a single WebSocket connection.
async fn handle_connection(socket: WebSocket, addr: SocketAddr, state: SharedGame, name: PlayerName) {
    info!("New connection from {}", addr);
    let (mut write, mut read) = socket.split();
    let Some((player_id, mut outbound)) = game::connect(&state, name, Some(addr)).await else {
        let _ = write.send(Message::Close(None)).await;
        return;
    };

    // Message loop - inbound frames and queued outbound frames
    loop {
        tokio::select! {
            msg = read.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        game::handle_message(&state, player_id, text.as_str()).await;
                    }
                    Some(Ok(Message::Binary(data))) => match std::str::from_utf8(&data) {
                        Ok(text) => game::handle_message(&state, player_id, text).await,
                        Err(_) => debug!("Ignoring non-UTF-8 frame from {}", addr),
                    },
                    Some(Ok(Message::Close(_))) => {
                        info!("Client {} closed the connection", addr);
                        break;
                    }
                    Some(Err(e)) => {
                        warn!("WebSocket error from {}: {}", addr, e);
                        break;
                    }
                    None => break,
                    _ => {}
                }
            }
            frame = outbound.recv() => {
                match frame {
                    Some(Outbound::Text(payload)) => {
                        if let Err(e) = write.send(Message::Text(payload.to_string().into())).await {
                            warn!("Failed to send to {}: {}", addr, e);
                            break;
                        }
                    }
                    Some(Outbound::Close) | None => {
                        let _ = write.send(Message::Close(None)).await;
                        break;
                    }
                }
            }
        }
    }

    game::disconnect(&state, player_id).await;
}

/// Resolve on SIGINT or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for SIGINT: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("SIGINT signal received. Game server is shutting down."),
        _ = terminate => info!("SIGTERM signal received. Game server is shutting down."),
    }
}
