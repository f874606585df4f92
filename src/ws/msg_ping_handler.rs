use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use crate::models::{PongMessage, ServerMessage};
use crate::AppState;

/// Handle a keepalive ping: answer the sender with a timestamped pong.
pub async fn handle_ping(connection_id: &str, app_state: &Arc<AppState>) {
    debug!("Ping from {}", connection_id);
    app_state
        .registry
        .send_to(
            connection_id,
            ServerMessage::Pong(PongMessage {
                date: Utc::now().to_rfc3339(),
            }),
        )
        .await;
}
