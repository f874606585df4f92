use std::sync::Arc;

use tracing::{debug, info};

use crate::models::{
    EditForward, EditMessage, JoinMessage, LanguageForward, LanguageMessage, MembersMessage,
    OutputForward, OutputMessage, ServerMessage, SyncMessage,
};
use crate::ws::handler::announce_departure;
use crate::AppState;

/// Handle a join: move the connection into the room, synchronize it with the
/// room's full current state, and tell everyone the new member count.
///
/// The snapshot sync is the sole recovery mechanism for a connection that
/// missed prior forwards (e.g. a reconnect).
pub async fn handle_join(msg: &JoinMessage, connection_id: &str, app_state: &Arc<AppState>) {
    info!("Connection {} joining room {}", connection_id, msg.room);

    let previous = app_state.registry.join(connection_id, &msg.room).await;
    if let Some(previous_room) = previous {
        if previous_room != msg.room {
            announce_departure(&previous_room, connection_id, app_state).await;
        }
    }

    let room_state = app_state.rooms.get_or_create(&msg.room).await;
    app_state
        .registry
        .send_to(
            connection_id,
            ServerMessage::Sync(SyncMessage {
                content: room_state.content,
                language: room_state.language,
                output: room_state.output,
            }),
        )
        .await;

    // The joiner needs the number too, so nobody is excluded here.
    let count = app_state.registry.count(&msg.room).await;
    app_state
        .registry
        .broadcast(&msg.room, None, &ServerMessage::Members(MembersMessage { count }))
        .await;
}

/// Handle an edit: refresh the authoritative snapshot, then forward the
/// delta and content verbatim to every other member. At-most-once; a dropped
/// forward is recovered only by the next edit or a fresh join's sync.
pub async fn handle_edit(msg: EditMessage, connection_id: &str, app_state: &Arc<AppState>) {
    debug!("Edit in room {} from {}", msg.room, connection_id);

    // The snapshot is always refreshed, delta or not.
    app_state
        .rooms
        .set_content(&msg.room, msg.content.clone())
        .await;

    app_state
        .registry
        .broadcast(
            &msg.room,
            Some(connection_id),
            &ServerMessage::Edit(EditForward {
                delta: msg.delta,
                content: msg.content,
            }),
        )
        .await;
}

/// Handle a language switch: update the room and forward the language alone.
pub async fn handle_language(msg: &LanguageMessage, connection_id: &str, app_state: &Arc<AppState>) {
    info!(
        "Language in room {} set to {} by {}",
        msg.room, msg.language, connection_id
    );

    app_state.rooms.set_language(&msg.room, msg.language).await;
    app_state
        .registry
        .broadcast(
            &msg.room,
            Some(connection_id),
            &ServerMessage::Language(LanguageForward {
                language: msg.language,
            }),
        )
        .await;
}

/// Handle an output change: update the room and forward the lines alone.
pub async fn handle_output(msg: OutputMessage, connection_id: &str, app_state: &Arc<AppState>) {
    debug!("Output in room {} updated by {}", msg.room, connection_id);

    app_state
        .rooms
        .set_output(&msg.room, msg.output.clone())
        .await;
    app_state
        .registry
        .broadcast(
            &msg.room,
            Some(connection_id),
            &ServerMessage::Output(OutputForward { output: msg.output }),
        )
        .await;
}
