use crate::models::DbQueueEntry;
use chrono::{DateTime, Utc};
use eyre::Result;
use sqlx::PgExecutor;
use uuid::Uuid;

use clinicdesk_core::models::queue::{QueuePriority, QueueStatus};

pub async fn create_queue_entry(
    executor: impl PgExecutor<'_>,
    patient_name: &str,
    priority: QueuePriority,
    now: DateTime<Utc>,
) -> Result<DbQueueEntry> {
    let id = Uuid::new_v4();

    tracing::debug!("Adding patient to queue: id={}, priority={}", id, priority);

    let entry = sqlx::query_as::<_, DbQueueEntry>(
        r#"
        INSERT INTO queue_entries (id, patient_name, priority, status, queue_number, arrival_time)
        VALUES ($1, $2, $3, $4, 0, $5)
        RETURNING id, patient_name, priority, status, queue_number, arrival_time
        "#,
    )
    .bind(id)
    .bind(patient_name)
    .bind(priority.to_string())
    .bind(QueueStatus::Waiting.to_string())
    .bind(now)
    .fetch_one(executor)
    .await?;

    Ok(entry)
}

pub async fn get_queue_entry_by_id(
    executor: impl PgExecutor<'_>,
    id: Uuid,
) -> Result<Option<DbQueueEntry>> {
    let entry = sqlx::query_as::<_, DbQueueEntry>(
        r#"
        SELECT id, patient_name, priority, status, queue_number, arrival_time
        FROM queue_entries
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(entry)
}

/// Waiting entries first in queue order, then the rest by arrival.
pub async fn list_queue(executor: impl PgExecutor<'_>) -> Result<Vec<DbQueueEntry>> {
    let entries = sqlx::query_as::<_, DbQueueEntry>(
        r#"
        SELECT id, patient_name, priority, status, queue_number, arrival_time
        FROM queue_entries
        ORDER BY (queue_number = 0) ASC, queue_number ASC, arrival_time ASC
        "#,
    )
    .fetch_all(executor)
    .await?;

    Ok(entries)
}

pub async fn list_by_status(
    executor: impl PgExecutor<'_>,
    status: QueueStatus,
) -> Result<Vec<DbQueueEntry>> {
    let entries = sqlx::query_as::<_, DbQueueEntry>(
        r#"
        SELECT id, patient_name, priority, status, queue_number, arrival_time
        FROM queue_entries
        WHERE status = $1
        ORDER BY queue_number ASC, arrival_time ASC
        "#,
    )
    .bind(status.to_string())
    .fetch_all(executor)
    .await?;

    Ok(entries)
}

/// Every entry, row-locked. Reorder reads the whole queue under a
/// transaction so concurrent mutations serialize.
pub async fn list_for_update(executor: impl PgExecutor<'_>) -> Result<Vec<DbQueueEntry>> {
    let entries = sqlx::query_as::<_, DbQueueEntry>(
        r#"
        SELECT id, patient_name, priority, status, queue_number, arrival_time
        FROM queue_entries
        ORDER BY arrival_time ASC
        FOR UPDATE
        "#,
    )
    .fetch_all(executor)
    .await?;

    Ok(entries)
}

pub async fn update_status(
    executor: impl PgExecutor<'_>,
    id: Uuid,
    status: QueueStatus,
) -> Result<DbQueueEntry> {
    tracing::debug!("Updating queue entry status: id={}, status={}", id, status);

    let entry = sqlx::query_as::<_, DbQueueEntry>(
        r#"
        UPDATE queue_entries
        SET status = $2
        WHERE id = $1
        RETURNING id, patient_name, priority, status, queue_number, arrival_time
        "#,
    )
    .bind(id)
    .bind(status.to_string())
    .fetch_one(executor)
    .await?;

    Ok(entry)
}

pub async fn update_priority(
    executor: impl PgExecutor<'_>,
    id: Uuid,
    priority: QueuePriority,
) -> Result<DbQueueEntry> {
    tracing::debug!("Updating queue entry priority: id={}, priority={}", id, priority);

    let entry = sqlx::query_as::<_, DbQueueEntry>(
        r#"
        UPDATE queue_entries
        SET priority = $2
        WHERE id = $1
        RETURNING id, patient_name, priority, status, queue_number, arrival_time
        "#,
    )
    .bind(id)
    .bind(priority.to_string())
    .fetch_one(executor)
    .await?;

    Ok(entry)
}

pub async fn update_queue_number(
    executor: impl PgExecutor<'_>,
    id: Uuid,
    queue_number: i32,
) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE queue_entries
        SET queue_number = $2
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(queue_number)
    .execute(executor)
    .await?;

    Ok(())
}

pub async fn delete_queue_entry(executor: impl PgExecutor<'_>, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM queue_entries WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn search_by_name(
    executor: impl PgExecutor<'_>,
    fragment: &str,
) -> Result<Vec<DbQueueEntry>> {
    let entries = sqlx::query_as::<_, DbQueueEntry>(
        r#"
        SELECT id, patient_name, priority, status, queue_number, arrival_time
        FROM queue_entries
        WHERE patient_name ILIKE '%' || $1 || '%'
        ORDER BY queue_number ASC
        "#,
    )
    .bind(fragment)
    .fetch_all(executor)
    .await?;

    Ok(entries)
}
