use crate::models::DbAppointment;
use chrono::{DateTime, Utc};
use eyre::Result;
use sqlx::PgExecutor;
use uuid::Uuid;

use clinicdesk_core::models::appointment::AppointmentStatus;

pub async fn create_appointment(
    executor: impl PgExecutor<'_>,
    patient_name: &str,
    doctor_id: Uuid,
    time_slot: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<DbAppointment> {
    let id = Uuid::new_v4();

    tracing::debug!(
        "Creating appointment: id={}, doctor_id={}, time_slot={}",
        id,
        doctor_id,
        time_slot
    );

    let appointment = sqlx::query_as::<_, DbAppointment>(
        r#"
        INSERT INTO appointments (id, patient_name, doctor_id, time_slot, status, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, patient_name, doctor_id, time_slot, status, created_at
        "#,
    )
    .bind(id)
    .bind(patient_name)
    .bind(doctor_id)
    .bind(time_slot)
    .bind(AppointmentStatus::Booked.to_string())
    .bind(now)
    .fetch_one(executor)
    .await?;

    Ok(appointment)
}

pub async fn get_appointment_by_id(
    executor: impl PgExecutor<'_>,
    id: Uuid,
) -> Result<Option<DbAppointment>> {
    let appointment = sqlx::query_as::<_, DbAppointment>(
        r#"
        SELECT id, patient_name, doctor_id, time_slot, status, created_at
        FROM appointments
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(appointment)
}

pub async fn list_appointments(executor: impl PgExecutor<'_>) -> Result<Vec<DbAppointment>> {
    let appointments = sqlx::query_as::<_, DbAppointment>(
        r#"
        SELECT id, patient_name, doctor_id, time_slot, status, created_at
        FROM appointments
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(executor)
    .await?;

    Ok(appointments)
}

/// Booked appointments for a doctor inside the open interval `(from, to)`.
/// The bounds are exclusive so a slot exactly one buffer away does not
/// register as a clash. `exclude` drops the appointment being rescheduled or
/// re-booked from its own conflict scan.
pub async fn find_booked_in_window(
    executor: impl PgExecutor<'_>,
    doctor_id: Uuid,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
    exclude: Option<Uuid>,
) -> Result<Vec<DbAppointment>> {
    let appointments = sqlx::query_as::<_, DbAppointment>(
        r#"
        SELECT id, patient_name, doctor_id, time_slot, status, created_at
        FROM appointments
        WHERE doctor_id = $1
          AND status = 'Booked'
          AND time_slot > $2
          AND time_slot < $3
          AND ($4::uuid IS NULL OR id <> $4)
        ORDER BY time_slot ASC
        "#,
    )
    .bind(doctor_id)
    .bind(from)
    .bind(to)
    .bind(exclude)
    .fetch_all(executor)
    .await?;

    Ok(appointments)
}

/// Booked appointments for a doctor starting after `from`, ascending.
pub async fn find_booked_from(
    executor: impl PgExecutor<'_>,
    doctor_id: Uuid,
    from: DateTime<Utc>,
) -> Result<Vec<DbAppointment>> {
    let appointments = sqlx::query_as::<_, DbAppointment>(
        r#"
        SELECT id, patient_name, doctor_id, time_slot, status, created_at
        FROM appointments
        WHERE doctor_id = $1
          AND status = 'Booked'
          AND time_slot > $2
        ORDER BY time_slot ASC
        "#,
    )
    .bind(doctor_id)
    .bind(from)
    .fetch_all(executor)
    .await?;

    Ok(appointments)
}

/// Booked appointments for a doctor within `[from, to)`, ascending. Used for
/// the doctor-local "today" slice of the dashboard projection.
pub async fn find_booked_between(
    executor: impl PgExecutor<'_>,
    doctor_id: Uuid,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<Vec<DbAppointment>> {
    let appointments = sqlx::query_as::<_, DbAppointment>(
        r#"
        SELECT id, patient_name, doctor_id, time_slot, status, created_at
        FROM appointments
        WHERE doctor_id = $1
          AND status = 'Booked'
          AND time_slot >= $2
          AND time_slot < $3
        ORDER BY time_slot ASC
        "#,
    )
    .bind(doctor_id)
    .bind(from)
    .bind(to)
    .fetch_all(executor)
    .await?;

    Ok(appointments)
}

pub async fn search_by_patient_name(
    executor: impl PgExecutor<'_>,
    fragment: &str,
) -> Result<Vec<DbAppointment>> {
    let appointments = sqlx::query_as::<_, DbAppointment>(
        r#"
        SELECT id, patient_name, doctor_id, time_slot, status, created_at
        FROM appointments
        WHERE patient_name ILIKE '%' || $1 || '%'
        ORDER BY time_slot ASC
        "#,
    )
    .bind(fragment)
    .fetch_all(executor)
    .await?;

    Ok(appointments)
}

pub async fn update_status(
    executor: impl PgExecutor<'_>,
    id: Uuid,
    status: AppointmentStatus,
) -> Result<DbAppointment> {
    tracing::debug!("Updating appointment status: id={}, status={}", id, status);

    let appointment = sqlx::query_as::<_, DbAppointment>(
        r#"
        UPDATE appointments
        SET status = $2
        WHERE id = $1
        RETURNING id, patient_name, doctor_id, time_slot, status, created_at
        "#,
    )
    .bind(id)
    .bind(status.to_string())
    .fetch_one(executor)
    .await?;

    Ok(appointment)
}

pub async fn update_time_slot(
    executor: impl PgExecutor<'_>,
    id: Uuid,
    time_slot: DateTime<Utc>,
) -> Result<DbAppointment> {
    tracing::debug!("Rescheduling appointment: id={}, time_slot={}", id, time_slot);

    let appointment = sqlx::query_as::<_, DbAppointment>(
        r#"
        UPDATE appointments
        SET time_slot = $2
        WHERE id = $1
        RETURNING id, patient_name, doctor_id, time_slot, status, created_at
        "#,
    )
    .bind(id)
    .bind(time_slot)
    .fetch_one(executor)
    .await?;

    Ok(appointment)
}

pub async fn delete_by_doctor(executor: impl PgExecutor<'_>, doctor_id: Uuid) -> Result<u64> {
    let result = sqlx::query("DELETE FROM appointments WHERE doctor_id = $1")
        .bind(doctor_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}
