pub mod protocol;
pub mod state_stream;

use crate::config::Config;
use crate::session::Session;
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State as AxumState, WebSocketUpgrade,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use protocol::{ClientMessage, ServerMessage};
use state_stream::StateStream;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::{interval, Duration};
use tower_http::services::ServeDir;

#[derive(Clone)]
struct AppState {
    stream: StateStream,
    config: Config,
}

pub async fn run_server(config: Config, session: Arc<RwLock<Session>>) -> std::io::Result<()> {
    let addr = format!("{}:{}", config.server.address, config.server.port);

    let app_state = AppState {
        stream: StateStream::new(session),
        config: config.clone(),
    };

    let app = Router::new()
        .route("/ws", get(websocket_handler))
        .fallback_service(ServeDir::new(&config.server.static_dir))
        .with_state(app_state);

    log::info!("HTTP server with WebSocket listening on: {}", addr);
    log::info!("Static files served from: {}", config.server.static_dir);
    log::info!("WebSocket endpoint: ws://{}/ws", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await
}

async fn websocket_handler(
    ws: WebSocketUpgrade,
    AxumState(state): AxumState<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_websocket(socket, state))
}

async fn send_message(sender: &mut SplitSink<WebSocket, Message>, message: &ServerMessage) -> bool {
    match serde_json::to_string(message) {
        Ok(json) => sender.send(Message::Text(json)).await.is_ok(),
        Err(e) => {
            log::error!("Failed to serialize message: {}", e);
            true
        }
    }
}

/// Frame push period, never shorter than one millisecond.
fn update_period(rate_hz: u64) -> Duration {
    Duration::from_millis((1000 / rate_hz.max(1)).max(1))
}

async fn handle_websocket(socket: WebSocket, app_state: AppState) {
    let (mut sender, mut receiver) = socket.split();
    let mut update_interval = interval(update_period(app_state.config.server.update_rate_hz));

    loop {
        tokio::select! {
            _ = update_interval.tick() => {
                let frame = app_state.stream.frame().await;
                if !send_message(&mut sender, &frame).await {
                    log::info!("Client disconnected");
                    break;
                }
            }

            Some(msg) = receiver.next() => {
                match msg {
                    Ok(Message::Text(text)) => {
                        let reply = match serde_json::from_str::<ClientMessage>(&text) {
                            Ok(command) => app_state.stream.handle(command).await,
                            Err(e) => ServerMessage::error(format!("unrecognized message: {}", e)),
                        };
                        if !send_message(&mut sender, &reply).await {
                            log::info!("Client disconnected");
                            break;
                        }
                    }
                    Ok(Message::Close(_)) => {
                        log::info!("Client requested close");
                        break;
                    }
                    Err(e) => {
                        log::error!("WebSocket error: {}", e);
                        break;
                    }
                    _ => {}
                }
            }
        }
    }

    log::info!("WebSocket connection closed");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_period_is_never_zero() {
        assert_eq!(update_period(10), Duration::from_millis(100));
        assert_eq!(update_period(0), Duration::from_millis(1000));
        assert_eq!(update_period(5000), Duration::from_millis(1));
    }
}
