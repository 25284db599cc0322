pub mod docs;
pub mod entries;
pub mod error;
pub mod state;

use axum::{Router, routing::get};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::state::AppState;

/// Leaderboard routes plus health, the OpenAPI document and Swagger UI,
/// no middleware.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/leaderboard",
            get(entries::list_entries).post(entries::create_entry),
        )
        .route("/api/leaderboard/top", get(entries::top_scores_default))
        .route("/api/leaderboard/top/{count}", get(entries::top_scores))
        .route(
            "/api/leaderboard/player/{player_name}",
            get(entries::player_scores),
        )
        .route(
            "/api/leaderboard/{id}",
            get(entries::get_entry).delete(entries::delete_entry),
        )
        .with_state(state)
        .route("/health", get(health))
        .merge(SwaggerUi::new("/swagger-ui").url(docs::OPENAPI_PATH, docs::ApiDoc::openapi()))
}

/// The full service: routes with CORS open to any origin and request tracing.
pub fn app(state: AppState) -> Router {
    router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// GET /health — liveness check.
pub async fn health() -> &'static str {
    "OK"
}
