pub mod client;
pub mod clients;
pub mod config;
pub mod docs;
pub mod handlers;
pub mod models;
pub mod rooms;
pub mod routes;
pub mod utils;
pub mod ws;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use rooms::{PeerRegistry, RoomStore};

/// Shared server state: the authoritative room store and the live peer
/// registry. Owned by the server process and injected everywhere, never
/// reached through an ambient global.
pub struct AppState {
    pub rooms: RoomStore,
    pub registry: PeerRegistry,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            rooms: RoomStore::new(),
            registry: PeerRegistry::new(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the full application router: WebSocket endpoint, API routes and
/// Swagger UI.
pub fn app(app_state: Arc<AppState>) -> Router {
    let api_routes = routes::create_api_routes(app_state.clone());

    Router::new()
        .route("/ws", get(ws::handler::websocket_handler))
        .with_state(app_state)
        // Mount API routes
        .nest("/api", api_routes)
        // Mount Swagger UI
        .merge(SwaggerUi::new("/swagger").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        // Add tracing layer
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
