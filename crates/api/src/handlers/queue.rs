//! # Queue Handlers
//!
//! Walk-in queue mutations. Every mutation runs inside a transaction that
//! ends with a full renumbering of the Waiting sequence, so the dense 1..N
//! ordering holds no matter which operation ran.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::{Postgres, Transaction};
use std::sync::Arc;
use uuid::Uuid;

use clinicdesk_core::{
    errors::ClinicError,
    models::queue::{
        AddPatientRequest, QueueEntry, QueueStatus, UpdateQueuePriorityRequest,
        UpdateQueueStatusRequest,
    },
    queue_order,
};
use clinicdesk_db::repositories;

use crate::{middleware::error_handling::AppError, ApiState};

/// Query parameters for the queue search endpoint
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub name: String,
}

/// Query parameters for the queue listing endpoint
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<QueueStatus>,
}

#[derive(Debug, Serialize)]
pub struct DeletePatientResponse {
    pub deleted: bool,
}

/// Recomputes queue numbers over the row-locked queue and writes only the
/// entries whose number changed.
async fn run_reorder(tx: &mut Transaction<'_, Postgres>) -> Result<(), AppError> {
    let entries = repositories::queue::list_for_update(&mut **tx)
        .await
        .map_err(ClinicError::Database)?
        .into_iter()
        .map(|row| row.into_model())
        .collect::<eyre::Result<Vec<_>>>()
        .map_err(ClinicError::Database)?;

    for assignment in queue_order::reorder(&entries) {
        repositories::queue::update_queue_number(&mut **tx, assignment.id, assignment.queue_number)
            .await
            .map_err(ClinicError::Database)?;
    }

    Ok(())
}

async fn load_entry(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
) -> Result<QueueEntry, AppError> {
    Ok(repositories::queue::get_queue_entry_by_id(&mut **tx, id)
        .await
        .map_err(ClinicError::Database)?
        .ok_or_else(|| ClinicError::NotFound("Queue entry not found".to_string()))?
        .into_model()
        .map_err(ClinicError::Database)?)
}

#[axum::debug_handler]
pub async fn add_patient(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<AddPatientRequest>,
) -> Result<Json<QueueEntry>, AppError> {
    if payload.patient_name.trim().is_empty() {
        return Err(AppError(ClinicError::Validation(
            "Patient name must not be empty".to_string(),
        )));
    }

    let now = state.clock.now();
    let mut tx = state.db_pool.begin().await?;

    let entry = repositories::queue::create_queue_entry(
        &mut *tx,
        &payload.patient_name,
        payload.priority,
        now,
    )
    .await
    .map_err(ClinicError::Database)?;

    // A High arrival has to jump ahead of queued Normals, so every add
    // renumbers the whole waiting sequence.
    run_reorder(&mut tx).await?;

    let entry = load_entry(&mut tx, entry.id).await?;
    tx.commit().await?;

    Ok(Json(entry))
}

#[axum::debug_handler]
pub async fn list_queue(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<QueueEntry>>, AppError> {
    let rows = match query.status {
        Some(status) => repositories::queue::list_by_status(&state.db_pool, status).await,
        None => repositories::queue::list_queue(&state.db_pool).await,
    }
    .map_err(ClinicError::Database)?;

    let entries = rows
        .into_iter()
        .map(|row| row.into_model())
        .collect::<eyre::Result<Vec<_>>>()
        .map_err(ClinicError::Database)?;

    Ok(Json(entries))
}

#[axum::debug_handler]
pub async fn update_queue_status(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateQueueStatusRequest>,
) -> Result<Json<QueueEntry>, AppError> {
    let mut tx = state.db_pool.begin().await?;

    load_entry(&mut tx, id).await?;
    repositories::queue::update_status(&mut *tx, id, payload.status)
        .await
        .map_err(ClinicError::Database)?;

    // Entries entering or leaving Waiting change the sequence membership.
    run_reorder(&mut tx).await?;

    let entry = load_entry(&mut tx, id).await?;
    tx.commit().await?;

    Ok(Json(entry))
}

#[axum::debug_handler]
pub async fn update_queue_priority(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateQueuePriorityRequest>,
) -> Result<Json<QueueEntry>, AppError> {
    let mut tx = state.db_pool.begin().await?;

    load_entry(&mut tx, id).await?;
    repositories::queue::update_priority(&mut *tx, id, payload.priority)
        .await
        .map_err(ClinicError::Database)?;

    run_reorder(&mut tx).await?;

    let entry = load_entry(&mut tx, id).await?;
    tx.commit().await?;

    Ok(Json(entry))
}

#[axum::debug_handler]
pub async fn delete_patient(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeletePatientResponse>, AppError> {
    let mut tx = state.db_pool.begin().await?;

    let deleted = repositories::queue::delete_queue_entry(&mut *tx, id)
        .await
        .map_err(ClinicError::Database)?;
    if !deleted {
        return Err(AppError(ClinicError::NotFound(
            "Queue entry not found".to_string(),
        )));
    }

    run_reorder(&mut tx).await?;
    tx.commit().await?;

    Ok(Json(DeletePatientResponse { deleted }))
}

#[axum::debug_handler]
pub async fn search_queue(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<QueueEntry>>, AppError> {
    let entries = repositories::queue::search_by_name(&state.db_pool, &query.name)
        .await
        .map_err(ClinicError::Database)?
        .into_iter()
        .map(|row| row.into_model())
        .collect::<eyre::Result<Vec<_>>>()
        .map_err(ClinicError::Database)?;

    Ok(Json(entries))
}
