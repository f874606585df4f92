use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Response for diagnostics information
#[derive(Serialize, Deserialize, ToSchema)]
pub struct DiagnosticsResponse {
    /// Live WebSocket connections
    pub n_conn: u32,
    /// Rooms currently held in the store
    pub n_rooms: u32,
    /// Connections currently joined to some room
    pub n_members: u32,
}
