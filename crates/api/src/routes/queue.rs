use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/queue", post(handlers::queue::add_patient))
        .route("/api/queue", get(handlers::queue::list_queue))
        .route("/api/queue/search", get(handlers::queue::search_queue))
        .route(
            "/api/queue/:id/status",
            put(handlers::queue::update_queue_status),
        )
        .route(
            "/api/queue/:id/priority",
            put(handlers::queue::update_queue_priority),
        )
        .route("/api/queue/:id", delete(handlers::queue::delete_patient))
}
