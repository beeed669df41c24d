use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/appointments",
            post(handlers::appointment::book_appointment),
        )
        .route(
            "/api/appointments",
            get(handlers::appointment::list_appointments),
        )
        .route(
            "/api/appointments/check",
            post(handlers::appointment::check_availability),
        )
        .route(
            "/api/appointments/search",
            get(handlers::appointment::search_appointments),
        )
        .route(
            "/api/appointments/:id/status",
            put(handlers::appointment::update_appointment_status),
        )
        .route(
            "/api/appointments/:id/reschedule",
            put(handlers::appointment::reschedule_appointment),
        )
        .route(
            "/api/appointments/:id/cancel",
            put(handlers::appointment::cancel_appointment),
        )
}
