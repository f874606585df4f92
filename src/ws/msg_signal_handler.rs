use std::sync::Arc;

use tracing::debug;

use crate::models::{
    AnswerMessage, IncomingAnswer, IncomingOffer, OfferMessage, PeersMessage, PeersRequest,
    ServerMessage,
};
use crate::AppState;

/// Reply to the requester, and only the requester, with the other members of
/// the room — the peers it should initiate a handshake with.
pub async fn handle_peers_request(
    msg: &PeersRequest,
    connection_id: &str,
    app_state: &Arc<AppState>,
) {
    let peers = app_state
        .registry
        .other_members(&msg.room, connection_id)
        .await;
    debug!(
        "Peer list for {} in room {}: {} peer(s)",
        connection_id,
        msg.room,
        peers.len()
    );
    app_state
        .registry
        .send_to(connection_id, ServerMessage::Peers(PeersMessage { peers }))
        .await;
}

/// Forward a handshake offer to its target, tagged with the sender's
/// connection id. The payload is never inspected; a target that has already
/// disconnected means the message is dropped without error.
///
/// The sender identity comes from the connection itself, not the wire, so a
/// client cannot claim to be another peer.
pub async fn handle_offer(msg: OfferMessage, connection_id: &str, app_state: &Arc<AppState>) {
    debug!("Relaying offer {} -> {}", connection_id, msg.target);
    app_state
        .registry
        .send_to(
            &msg.target,
            ServerMessage::Offer(IncomingOffer {
                sender: connection_id.to_string(),
                payload: msg.payload,
            }),
        )
        .await;
}

/// Forward a handshake answer to its target, tagged with the responder's
/// connection id.
pub async fn handle_answer(msg: AnswerMessage, connection_id: &str, app_state: &Arc<AppState>) {
    debug!("Relaying answer {} -> {}", connection_id, msg.target);
    app_state
        .registry
        .send_to(
            &msg.target,
            ServerMessage::Answer(IncomingAnswer {
                responder: connection_id.to_string(),
                payload: msg.payload,
            }),
        )
        .await;
}
