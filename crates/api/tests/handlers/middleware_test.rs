use axum::body::to_bytes;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use pretty_assertions::assert_eq;

use clinicdesk_api::middleware::auth;
use clinicdesk_api::middleware::error_handling::AppError;
use clinicdesk_core::errors::ClinicError;
use clinicdesk_core::scheduling::ScheduleError;

#[test]
fn test_verify_token() {
    assert!(auth::verify_token("front-desk-token", "front-desk-token"));
    assert!(!auth::verify_token("wrong", "front-desk-token"));
    assert!(!auth::verify_token("", "front-desk-token"));
}

#[test]
fn test_status_code_mapping() {
    let cases = [
        (
            AppError(ClinicError::NotFound("missing".to_string())),
            StatusCode::NOT_FOUND,
        ),
        (
            AppError(ClinicError::Validation("bad input".to_string())),
            StatusCode::BAD_REQUEST,
        ),
        (
            AppError(ClinicError::Conflict("clash".to_string())),
            StatusCode::BAD_REQUEST,
        ),
        (
            AppError(ClinicError::Authentication("no token".to_string())),
            StatusCode::UNAUTHORIZED,
        ),
        (
            AppError(ClinicError::Database(eyre::eyre!("connection lost"))),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
    ];

    for (error, expected) in cases {
        assert_eq!(error.into_response().status(), expected);
    }
}

// Booking rejections are business failures, not server errors: everything
// except a missing record maps to 400.
#[test]
fn test_schedule_error_status_codes() {
    let bad_request = [
        ScheduleError::InvalidTimeSlot,
        ScheduleError::PastTime,
        ScheduleError::DayUnavailable("Sunday".to_string()),
        ScheduleError::NoWorkingHours("Monday".to_string()),
        ScheduleError::OutsideWorkingHours("09:00 - 17:00".to_string()),
        ScheduleError::Conflict,
    ];
    for error in bad_request {
        assert_eq!(
            AppError::from(error).into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }

    assert_eq!(
        AppError::from(ScheduleError::DoctorNotFound)
            .into_response()
            .status(),
        StatusCode::NOT_FOUND
    );
}

// Callers surface the engine message verbatim in the JSON body.
#[tokio::test]
async fn test_error_body_carries_the_message() {
    let response = AppError::from(ScheduleError::Conflict).into_response();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    let value: serde_json::Value =
        serde_json::from_slice(&body).expect("body should be JSON");

    assert_eq!(
        value["error"],
        serde_json::json!(
            "Conflict: Doctor not available at this time (conflicts with another appointment)."
        )
    );
}
