use crate::models::DbDoctor;
use chrono::Utc;
use eyre::Result;
use sqlx::types::Json;
use sqlx::{PgExecutor, Pool, Postgres};
use uuid::Uuid;

use clinicdesk_core::models::doctor::{CreateDoctorRequest, Doctor};

pub async fn create_doctor(
    executor: impl PgExecutor<'_>,
    request: &CreateDoctorRequest,
) -> Result<DbDoctor> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!("Creating doctor: id={}, name={}", id, request.name);

    let doctor = sqlx::query_as::<_, DbDoctor>(
        r#"
        INSERT INTO doctors (id, name, specialization, gender, location, timezone, available_days, working_hours, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING id, name, specialization, gender, location, timezone, available_days, working_hours, created_at
        "#,
    )
    .bind(id)
    .bind(&request.name)
    .bind(&request.specialization)
    .bind(&request.gender)
    .bind(&request.location)
    .bind(&request.timezone)
    .bind(Json(&request.available_days))
    .bind(Json(&request.working_hours))
    .bind(now)
    .fetch_one(executor)
    .await?;

    Ok(doctor)
}

pub async fn get_doctor_by_id(
    executor: impl PgExecutor<'_>,
    id: Uuid,
) -> Result<Option<DbDoctor>> {
    let doctor = sqlx::query_as::<_, DbDoctor>(
        r#"
        SELECT id, name, specialization, gender, location, timezone, available_days, working_hours, created_at
        FROM doctors
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(doctor)
}

/// Same lookup with a row lock. Booking and rescheduling lock the doctor row
/// so two concurrent callers cannot both pass the conflict check for the
/// same doctor.
pub async fn get_doctor_by_id_for_update(
    executor: impl PgExecutor<'_>,
    id: Uuid,
) -> Result<Option<DbDoctor>> {
    let doctor = sqlx::query_as::<_, DbDoctor>(
        r#"
        SELECT id, name, specialization, gender, location, timezone, available_days, working_hours, created_at
        FROM doctors
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(doctor)
}

pub async fn list_doctors(executor: impl PgExecutor<'_>) -> Result<Vec<DbDoctor>> {
    let doctors = sqlx::query_as::<_, DbDoctor>(
        r#"
        SELECT id, name, specialization, gender, location, timezone, available_days, working_hours, created_at
        FROM doctors
        ORDER BY name ASC
        "#,
    )
    .fetch_all(executor)
    .await?;

    Ok(doctors)
}

/// Writes the full set of mutable fields. Callers merge the update request
/// into the loaded record and re-validate before persisting.
pub async fn update_doctor(executor: impl PgExecutor<'_>, doctor: &Doctor) -> Result<DbDoctor> {
    tracing::debug!("Updating doctor: id={}", doctor.id);

    let updated = sqlx::query_as::<_, DbDoctor>(
        r#"
        UPDATE doctors
        SET name = $2, specialization = $3, gender = $4, location = $5, timezone = $6,
            available_days = $7, working_hours = $8
        WHERE id = $1
        RETURNING id, name, specialization, gender, location, timezone, available_days, working_hours, created_at
        "#,
    )
    .bind(doctor.id)
    .bind(&doctor.name)
    .bind(&doctor.specialization)
    .bind(&doctor.gender)
    .bind(&doctor.location)
    .bind(&doctor.timezone)
    .bind(Json(&doctor.available_days))
    .bind(Json(&doctor.working_hours))
    .fetch_one(executor)
    .await?;

    Ok(updated)
}

/// Deletes a doctor and their appointments as one transaction. The cascade
/// is an explicit two-step write, not a foreign-key side effect.
pub async fn delete_doctor(pool: &Pool<Postgres>, id: Uuid) -> Result<bool> {
    let mut tx = pool.begin().await?;

    let appointments = super::appointment::delete_by_doctor(&mut *tx, id).await?;

    let result = sqlx::query("DELETE FROM doctors WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::debug!(
        "Deleted doctor {} and {} appointments",
        id,
        appointments
    );

    Ok(result.rows_affected() > 0)
}
