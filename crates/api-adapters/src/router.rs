use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::require_caller;
use crate::state::AppState;

/// Saved boards carry a thumbnail data URL plus every stroke.
const SAVE_BODY_LIMIT: usize = 16 * 1024 * 1024;

/// Configures the routes for the board service.
///
/// Everything except `/health` and `/metrics` sits behind the access gate.
pub fn router(state: AppState) -> Router {
    let gated = Router::new()
        .route("/dashboard", get(handlers::dashboard))
        .route("/dashboard/create-board", post(handlers::create_board))
        .route(
            "/dashboard/save-board",
            post(handlers::save_board).layer(DefaultBodyLimit::max(SAVE_BODY_LIMIT)),
        )
        .route("/dashboard/get-board-data", get(handlers::get_board_data))
        .route("/dashboard/delete-board", post(handlers::delete_board))
        .route("/search", get(handlers::search))
        .route_layer(from_fn_with_state(state.clone(), require_caller));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .merge(gated)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
