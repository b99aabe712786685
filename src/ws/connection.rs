//! WebSocket feed of the ranked leaderboard.

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use tokio::sync::watch;

use crate::http::routes::AppState;
use crate::leaderboard::ScoreEntry;

pub async fn ws_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    let view = state.leaderboard.watch();
    ws.on_upgrade(move |socket| handle_socket(socket, view))
}

async fn handle_socket(socket: WebSocket, mut view: watch::Receiver<Vec<ScoreEntry>>) {
    let (mut ws_tx, mut ws_rx) = socket.split();

    // push the current view, then every change after it
    let mut push = tokio::spawn(async move {
        loop {
            let text = match serde_json::to_string(&*view.borrow_and_update()) {
                Ok(text) => text,
                Err(err) => {
                    tracing::warn!(error = %err, "could not encode leaderboard");
                    break;
                }
            };
            if ws_tx.send(Message::Text(text)).await.is_err() {
                break;
            }
            if view.changed().await.is_err() {
                break;
            }
        }
    });

    loop {
        tokio::select! {
            _ = &mut push => break,
            msg = ws_rx.next() => match msg {
                Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                Some(Ok(_)) => {}
            },
        }
    }
    push.abort();
    tracing::debug!("ws closed");
}
