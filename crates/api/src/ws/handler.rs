use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{Sink, SinkExt, StreamExt};

use crate::feed::{FeedSnapshot, FeedSubscription};
use crate::state::AppState;

/// HTTP handler that upgrades the connection to a live-feed WebSocket.
///
/// Each connection gets its own [`FeedSubscription`]; every snapshot is
/// sent as one JSON text frame.
pub async fn live_feed_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Drive one connection until either side goes away.
///
/// The subscription is dropped on return, which stops its refresh task.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, "Live feed connected");

    let mut feed = FeedSubscription::start(state.inquiries.clone(), &state.event_bus).await;
    let (mut sink, mut stream) = socket.split();

    if send_snapshot(&mut sink, &feed.current()).await.is_err() {
        tracing::debug!(conn_id = %conn_id, "Live feed sink closed before first snapshot");
        return;
    }

    loop {
        tokio::select! {
            snapshot = feed.changed() => {
                let Some(snapshot) = snapshot else { break };
                if send_snapshot(&mut sink, &snapshot).await.is_err() {
                    tracing::debug!(conn_id = %conn_id, "Live feed sink closed");
                    break;
                }
            }
            inbound = stream.next() => match inbound {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                    break;
                }
            },
        }
    }

    feed.close();
    tracing::info!(conn_id = %conn_id, "Live feed disconnected");
}

async fn send_snapshot<S>(sink: &mut S, snapshot: &FeedSnapshot) -> Result<(), S::Error>
where
    S: Sink<Message> + Unpin,
{
    let text = match serde_json::to_string(snapshot) {
        Ok(text) => text,
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize live feed snapshot");
            return Ok(());
        }
    };
    sink.send(Message::Text(text.into())).await
}
