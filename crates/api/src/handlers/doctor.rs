//! # Doctor Handlers
//!
//! Doctor directory CRUD plus the two availability projections: the status
//! card list on `GET /api/doctors` and the free/busy schedule view on
//! `GET /api/doctors/:id/schedule`.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Duration;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use clinicdesk_core::{
    availability::{self, ScheduleStatus},
    errors::ClinicError,
    models::doctor::{CreateDoctorRequest, Doctor, DoctorWithStatus, UpdateDoctorRequest},
    scheduling::APPOINTMENT_DURATION_MINUTES,
};
use clinicdesk_db::repositories;

use crate::{middleware::error_handling::AppError, ApiState};

#[derive(Debug, Serialize)]
pub struct DeleteDoctorResponse {
    pub deleted: bool,
}

#[axum::debug_handler]
pub async fn create_doctor(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateDoctorRequest>,
) -> Result<Json<Doctor>, AppError> {
    payload.validate()?;

    let doctor = repositories::doctor::create_doctor(&state.db_pool, &payload)
        .await
        .map_err(ClinicError::Database)?;

    Ok(Json(doctor.into()))
}

/// Doctor list with the live status projection the dashboard renders.
#[axum::debug_handler]
pub async fn list_doctors(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<DoctorWithStatus>>, AppError> {
    let now = state.clock.now();
    let doctors = repositories::doctor::list_doctors(&state.db_pool)
        .await
        .map_err(ClinicError::Database)?;

    let mut result = Vec::with_capacity(doctors.len());
    for doctor in doctors {
        let doctor: Doctor = doctor.into();
        let (day_start, day_end) = availability::local_day_bounds(doctor.tz(), now);
        let todays_booked = repositories::appointment::find_booked_between(
            &state.db_pool,
            doctor.id,
            day_start,
            day_end,
        )
        .await
        .map_err(ClinicError::Database)?
        .into_iter()
        .map(|row| row.into_model())
        .collect::<eyre::Result<Vec<_>>>()
        .map_err(ClinicError::Database)?;

        let (status, next_available) = availability::project_card(&doctor, &todays_booked, now);
        result.push(DoctorWithStatus {
            doctor,
            status,
            next_available,
        });
    }

    Ok(Json(result))
}

#[axum::debug_handler]
pub async fn get_doctor(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Doctor>, AppError> {
    let doctor = repositories::doctor::get_doctor_by_id(&state.db_pool, id)
        .await
        .map_err(ClinicError::Database)?
        .ok_or_else(|| ClinicError::NotFound(format!("Doctor with ID {} not found", id)))?;

    Ok(Json(doctor.into()))
}

#[axum::debug_handler]
pub async fn update_doctor(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateDoctorRequest>,
) -> Result<Json<Doctor>, AppError> {
    let mut doctor: Doctor = repositories::doctor::get_doctor_by_id(&state.db_pool, id)
        .await
        .map_err(ClinicError::Database)?
        .ok_or_else(|| ClinicError::NotFound(format!("Doctor with ID {} not found", id)))?
        .into();

    payload.apply(&mut doctor)?;

    let updated = repositories::doctor::update_doctor(&state.db_pool, &doctor)
        .await
        .map_err(ClinicError::Database)?;

    Ok(Json(updated.into()))
}

/// Removes the doctor and, in the same transaction, every appointment that
/// references them.
#[axum::debug_handler]
pub async fn delete_doctor(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteDoctorResponse>, AppError> {
    let deleted = repositories::doctor::delete_doctor(&state.db_pool, id)
        .await
        .map_err(ClinicError::Database)?;

    if !deleted {
        return Err(AppError(ClinicError::NotFound(format!(
            "Doctor with ID {} not found",
            id
        ))));
    }

    Ok(Json(DeleteDoctorResponse { deleted }))
}

/// Free/busy projection with the upcoming Booked appointments. The query
/// reaches back one appointment duration so an in-progress visit still
/// counts as busy.
#[axum::debug_handler]
pub async fn get_doctor_schedule(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ScheduleStatus>, AppError> {
    let now = state.clock.now();

    repositories::doctor::get_doctor_by_id(&state.db_pool, id)
        .await
        .map_err(ClinicError::Database)?
        .ok_or_else(|| ClinicError::NotFound(format!("Doctor with ID {} not found", id)))?;

    let appointments = repositories::appointment::find_booked_from(
        &state.db_pool,
        id,
        now - Duration::minutes(APPOINTMENT_DURATION_MINUTES),
    )
    .await
    .map_err(ClinicError::Database)?
    .into_iter()
    .map(|row| row.into_model())
    .collect::<eyre::Result<Vec<_>>>()
    .map_err(ClinicError::Database)?;

    Ok(Json(availability::doctor_status(appointments, now)))
}
