use std::sync::Arc;

use axum::{extract::State, Json};
use tracing::info;

use crate::models::DiagnosticsResponse;
use crate::AppState;

/// Report live connection and room counts.
pub async fn diagnostics(State(app_state): State<Arc<AppState>>) -> Json<DiagnosticsResponse> {
    let n_conn = app_state.registry.connection_count().await as u32;
    let n_members = app_state.registry.member_count().await as u32;
    let n_rooms = app_state.rooms.room_count().await as u32;

    info!(
        "Diagnostics: Conn: {}, Members: {}, Rooms: {}",
        n_conn, n_members, n_rooms
    );

    Json(DiagnosticsResponse {
        n_conn,
        n_rooms,
        n_members,
    })
}
