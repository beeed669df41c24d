use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/doctors", post(handlers::doctor::create_doctor))
        .route("/api/doctors", get(handlers::doctor::list_doctors))
        .route("/api/doctors/:id", get(handlers::doctor::get_doctor))
        .route("/api/doctors/:id", put(handlers::doctor::update_doctor))
        .route("/api/doctors/:id", delete(handlers::doctor::delete_doctor))
        .route(
            "/api/doctors/:id/schedule",
            get(handlers::doctor::get_doctor_schedule),
        )
}
