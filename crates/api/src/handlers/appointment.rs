//! # Appointment Handlers
//!
//! Booking, rescheduling, and status transitions. Each mutating handler
//! reads the clock once, opens a transaction, locks the doctor row, runs the
//! scheduling engine's checks, and only then writes — so two concurrent
//! callers cannot both observe a free window and both commit.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use clinicdesk_core::{
    errors::ClinicError,
    models::appointment::{
        Appointment, AppointmentStatus, BookAppointmentRequest, CheckAvailabilityRequest,
        CheckAvailabilityResponse, RescheduleAppointmentRequest, UpdateAppointmentStatusRequest,
    },
    models::doctor::Doctor,
    scheduling::{self, ScheduleError},
};
use clinicdesk_db::repositories;

use crate::{middleware::error_handling::AppError, ApiState};

/// Query parameters for the appointment search endpoint
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub name: String,
}

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<BookAppointmentRequest>,
) -> Result<Json<Appointment>, AppError> {
    if payload.patient_name.trim().is_empty() {
        return Err(AppError(ClinicError::Validation(
            "Patient name must not be empty".to_string(),
        )));
    }

    let now = state.clock.now();
    let mut tx = state.db_pool.begin().await?;

    // Lock the doctor row; concurrent bookers for the same doctor serialize
    // here and re-run the conflict scan against the committed state.
    let doctor: Doctor =
        repositories::doctor::get_doctor_by_id_for_update(&mut *tx, payload.doctor_id)
            .await
            .map_err(ClinicError::Database)?
            .ok_or(ScheduleError::DoctorNotFound)?
            .into();

    let slot = scheduling::normalize_time(&payload.time_slot)?;
    scheduling::validate_slot(&doctor, slot, now)?;

    let (from, to) = scheduling::conflict_window(slot);
    let clashes =
        repositories::appointment::find_booked_in_window(&mut *tx, doctor.id, from, to, None)
            .await
            .map_err(ClinicError::Database)?;
    if !clashes.is_empty() {
        return Err(ScheduleError::Conflict.into());
    }

    let appointment = repositories::appointment::create_appointment(
        &mut *tx,
        &payload.patient_name,
        doctor.id,
        slot,
        now,
    )
    .await
    .map_err(ClinicError::Database)?;

    tx.commit().await?;

    Ok(Json(appointment.into_model().map_err(ClinicError::Database)?))
}

#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let appointments = repositories::appointment::list_appointments(&state.db_pool)
        .await
        .map_err(ClinicError::Database)?;

    let appointments = appointments
        .into_iter()
        .map(|row| row.into_model())
        .collect::<eyre::Result<Vec<_>>>()
        .map_err(ClinicError::Database)?;

    Ok(Json(appointments))
}

/// Advisory pre-check used by the dashboard before reverting a cancelled
/// appointment; nothing is committed.
#[axum::debug_handler]
pub async fn check_availability(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CheckAvailabilityRequest>,
) -> Result<Json<CheckAvailabilityResponse>, AppError> {
    let slot = scheduling::normalize_time(&payload.time_slot)?;
    let (from, to) = scheduling::conflict_window(slot);

    let clashes = repositories::appointment::find_booked_in_window(
        &state.db_pool,
        payload.doctor_id,
        from,
        to,
        None,
    )
    .await
    .map_err(ClinicError::Database)?;

    if !clashes.is_empty() {
        return Err(AppError(ClinicError::Conflict(
            "Time slot clashes with another appointment".to_string(),
        )));
    }

    Ok(Json(CheckAvailabilityResponse { available: true }))
}

#[axum::debug_handler]
pub async fn search_appointments(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let appointments =
        repositories::appointment::search_by_patient_name(&state.db_pool, &query.name)
            .await
            .map_err(ClinicError::Database)?;

    let appointments = appointments
        .into_iter()
        .map(|row| row.into_model())
        .collect::<eyre::Result<Vec<_>>>()
        .map_err(ClinicError::Database)?;

    Ok(Json(appointments))
}

/// Shared by the status and cancel endpoints. Reverting to Booked re-runs
/// the conflict scan (excluding the appointment's own slot) and the
/// past-time check; every other transition is unconditional.
async fn apply_status(
    state: &ApiState,
    id: Uuid,
    status: AppointmentStatus,
) -> Result<Appointment, AppError> {
    let now = state.clock.now();
    let mut tx = state.db_pool.begin().await?;

    let appointment = repositories::appointment::get_appointment_by_id(&mut *tx, id)
        .await
        .map_err(ClinicError::Database)?
        .ok_or_else(|| ClinicError::NotFound("Appointment not found".to_string()))?
        .into_model()
        .map_err(ClinicError::Database)?;

    if status == AppointmentStatus::Booked {
        // Serialize with concurrent booking for the same doctor.
        repositories::doctor::get_doctor_by_id_for_update(&mut *tx, appointment.doctor_id)
            .await
            .map_err(ClinicError::Database)?
            .ok_or(ScheduleError::DoctorNotFound)?;

        let (from, to) = scheduling::conflict_window(appointment.time_slot);
        let clashes = repositories::appointment::find_booked_in_window(
            &mut *tx,
            appointment.doctor_id,
            from,
            to,
            Some(appointment.id),
        )
        .await
        .map_err(ClinicError::Database)?;
        if !clashes.is_empty() {
            return Err(AppError(ClinicError::Conflict(
                "Doctor is already booked around this time (±30 min).".to_string(),
            )));
        }

        if appointment.time_slot < now {
            return Err(AppError(ClinicError::Conflict(
                "Cannot revert to booked for a past time.".to_string(),
            )));
        }
    }

    let updated = repositories::appointment::update_status(&mut *tx, id, status)
        .await
        .map_err(ClinicError::Database)?;

    tx.commit().await?;

    Ok(updated.into_model().map_err(ClinicError::Database)?)
}

#[axum::debug_handler]
pub async fn update_appointment_status(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAppointmentStatusRequest>,
) -> Result<Json<Appointment>, AppError> {
    let appointment = apply_status(&state, id, payload.status).await?;
    Ok(Json(appointment))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Appointment>, AppError> {
    let appointment = apply_status(&state, id, AppointmentStatus::Cancelled).await?;
    Ok(Json(appointment))
}

#[axum::debug_handler]
pub async fn reschedule_appointment(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RescheduleAppointmentRequest>,
) -> Result<Json<Appointment>, AppError> {
    let now = state.clock.now();
    let mut tx = state.db_pool.begin().await?;

    let appointment = repositories::appointment::get_appointment_by_id(&mut *tx, id)
        .await
        .map_err(ClinicError::Database)?
        .ok_or_else(|| ClinicError::NotFound("Appointment not found".to_string()))?
        .into_model()
        .map_err(ClinicError::Database)?;

    // The doctor is not re-selectable on reschedule.
    let doctor: Doctor =
        repositories::doctor::get_doctor_by_id_for_update(&mut *tx, appointment.doctor_id)
            .await
            .map_err(ClinicError::Database)?
            .ok_or(ScheduleError::DoctorNotFound)?
            .into();

    let slot = scheduling::normalize_time(&payload.time_slot)?;
    scheduling::validate_slot(&doctor, slot, now)?;

    let (from, to) = scheduling::conflict_window(slot);
    let clashes = repositories::appointment::find_booked_in_window(
        &mut *tx,
        doctor.id,
        from,
        to,
        Some(appointment.id),
    )
    .await
    .map_err(ClinicError::Database)?;
    if !clashes.is_empty() {
        return Err(ScheduleError::Conflict.into());
    }

    let updated = repositories::appointment::update_time_slot(&mut *tx, id, slot)
        .await
        .map_err(ClinicError::Database)?;

    tx.commit().await?;

    Ok(Json(updated.into_model().map_err(ClinicError::Database)?))
}
