use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Leave room for the text fields around the photo part
    let upload_limit = usize::try_from(state.config.max_upload_size)
        .unwrap_or(usize::MAX)
        .saturating_add(64 * 1024);

    Router::new()
        // Items
        .route(
            "/register",
            post(handlers::register).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/inventory", get(handlers::list_items))
        .route(
            "/inventory/:id",
            get(handlers::get_item)
                .put(handlers::update_item)
                .delete(handlers::delete_item),
        )
        .route("/inventory/:id/photo", get(handlers::get_photo))
        .route("/search", post(handlers::search))
        // Static pages
        .route("/RegisterForm.html", get(handlers::register_form))
        .route("/SearchForm.html", get(handlers::search_form))
        .route("/docs", get(handlers::docs))
        .route("/docs/", get(handlers::docs))
        .route("/docs/openapi.yaml", get(handlers::openapi_spec))
        // Internal
        .route("/_internal/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
