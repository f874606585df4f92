use std::sync::Arc;

use axum::{
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    extract::State,
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{error, info};
use uuid::Uuid;

use crate::models::{ClientMessage, MembersMessage, PeerLeftMessage, ServerMessage};
use crate::ws::{msg_ping_handler, msg_room_handler, msg_signal_handler};
use crate::AppState;

/// WebSocket handler
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(app_state): State<Arc<AppState>>,
) -> Response {
    info!("New WebSocket connection attempt");
    ws.on_upgrade(move |socket| handle_socket(socket, app_state))
}

/// Handle WebSocket connection
async fn handle_socket(socket: WebSocket, app_state: Arc<AppState>) {
    // Generate unique connection ID to identify this client
    let connection_id = Uuid::new_v4().to_string();
    info!("WebSocket connection established with connection_id: {}", connection_id);

    // Split the socket into sender and receiver
    let (mut sender, mut receiver) = socket.split();

    // Register the outbound channel; everything addressed to this connection
    // goes through it, which keeps per-receiver delivery ordered.
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();
    app_state.registry.register(&connection_id, tx).await;

    // Drain outbound messages onto the socket as a separate asynchronous task
    let mut send_task = tokio::spawn(async move {
        while let Some(outbound) = rx.recv().await {
            let text = match serde_json::to_string(&outbound) {
                Ok(text) => text,
                Err(e) => {
                    error!("Failed to serialize outbound message: {}", e);
                    continue;
                }
            };
            if sender.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    // Listen to the websocket for incoming messages.
    // Only text frames carry protocol messages; other frames are skipped and
    // a close frame or errored stream ends the loop.
    let recv_state = app_state.clone();
    let recv_connection_id = connection_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(frame)) = receiver.next().await {
            let msg = match frame {
                Message::Text(msg) => msg,
                Message::Close(_) => break,
                _ => continue,
            };

            // Parse the incoming message as JSON
            let parsed: ClientMessage = match serde_json::from_str(&msg) {
                Ok(parsed) => parsed,
                Err(e) => {
                    error!(
                        "Failed to parse message from {}: {}",
                        recv_connection_id, e
                    );
                    continue;
                }
            };
            dispatch_message(parsed, &recv_connection_id, &recv_state).await;
        }
    });

    // Wait for either task to finish (and finish the other)
    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    // Cleanup runs synchronously on the close event, whatever the cause.
    handle_disconnect(&connection_id, &app_state).await;
    info!("WebSocket connection terminated: {}", connection_id);
}

/// Single dispatch point for the per-connection state machine.
async fn dispatch_message(msg: ClientMessage, connection_id: &str, app_state: &Arc<AppState>) {
    match msg {
        ClientMessage::Join(join_msg) => {
            msg_room_handler::handle_join(&join_msg, connection_id, app_state).await;
        }
        ClientMessage::Edit(edit_msg) => {
            msg_room_handler::handle_edit(edit_msg, connection_id, app_state).await;
        }
        ClientMessage::Language(language_msg) => {
            msg_room_handler::handle_language(&language_msg, connection_id, app_state).await;
        }
        ClientMessage::Output(output_msg) => {
            msg_room_handler::handle_output(output_msg, connection_id, app_state).await;
        }
        ClientMessage::Peers(peers_req) => {
            msg_signal_handler::handle_peers_request(&peers_req, connection_id, app_state).await;
        }
        ClientMessage::Offer(offer_msg) => {
            msg_signal_handler::handle_offer(offer_msg, connection_id, app_state).await;
        }
        ClientMessage::Answer(answer_msg) => {
            msg_signal_handler::handle_answer(answer_msg, connection_id, app_state).await;
        }
        ClientMessage::Ping => {
            msg_ping_handler::handle_ping(connection_id, app_state).await;
        }
    }
}

/// Remove a closed connection and notify the room it was in.
///
/// Idempotent: a connection that never joined a room produces no broadcasts.
async fn handle_disconnect(connection_id: &str, app_state: &Arc<AppState>) {
    let left_room = app_state.registry.leave(connection_id).await;
    app_state.registry.unregister(connection_id).await;

    if let Some(room_key) = left_room {
        announce_departure(&room_key, connection_id, app_state).await;
    }
}

/// Broadcast the new member count and a peer-left notification to whoever
/// remains in `room_key`; delete the room when nobody does.
///
/// The peer-left notification is distinct from the count: the audio layer
/// needs the explicit identifier to tear down its channel for that peer.
pub(crate) async fn announce_departure(
    room_key: &str,
    connection_id: &str,
    app_state: &Arc<AppState>,
) {
    let count = app_state.registry.count(room_key).await;
    if count == 0 {
        app_state.rooms.remove(room_key).await;
        return;
    }

    app_state
        .registry
        .broadcast(room_key, None, &ServerMessage::Members(MembersMessage { count }))
        .await;
    app_state
        .registry
        .broadcast(
            room_key,
            None,
            &ServerMessage::PeerLeft(PeerLeftMessage {
                id: connection_id.to_string(),
            }),
        )
        .await;
}
