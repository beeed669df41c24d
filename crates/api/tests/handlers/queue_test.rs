use chrono::{DateTime, TimeZone, Utc};
use mockall::predicate;
use pretty_assertions::assert_eq;
use uuid::Uuid;

use clinicdesk_api::middleware::error_handling::AppError;
use clinicdesk_core::models::queue::{QueuePriority, QueueStatus};
use clinicdesk_core::queue_order::{self, QueueAssignment};

use crate::test_utils::{db_queue_entry, TestContext};

fn arrival(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 9, 7, 9, minute, 0).unwrap()
}

// Mirrors the add handler: insert the entry, then renumber the whole
// waiting sequence over the locked queue.
async fn add_patient_flow(
    ctx: &mut TestContext,
    name: &str,
    priority: QueuePriority,
    now: DateTime<Utc>,
) -> Result<Vec<QueueAssignment>, AppError> {
    ctx.queue_repo
        .create_queue_entry(name.to_string(), priority, now)
        .await?;

    reorder_flow(ctx).await
}

// Mirrors the tail of every queue mutation handler.
async fn reorder_flow(ctx: &mut TestContext) -> Result<Vec<QueueAssignment>, AppError> {
    let entries = ctx
        .queue_repo
        .list_for_update()
        .await?
        .into_iter()
        .map(|row| row.into_model())
        .collect::<eyre::Result<Vec<_>>>()?;

    let assignments = queue_order::reorder(&entries);
    for assignment in &assignments {
        ctx.queue_repo
            .update_queue_number(assignment.id, assignment.queue_number)
            .await?;
    }

    Ok(assignments)
}

fn assignment_for(assignments: &[QueueAssignment], id: Uuid) -> Option<i32> {
    assignments
        .iter()
        .find(|a| a.id == id)
        .map(|a| a.queue_number)
}

#[tokio::test]
async fn test_high_priority_arrival_takes_the_head() {
    let mut ctx = TestContext::new();

    let normal = db_queue_entry("normal", "Normal", "Waiting", 1, arrival(0));
    let high = db_queue_entry("high", "High", "Waiting", 0, arrival(5));
    let normal_id = normal.id;
    let high_id = high.id;

    ctx.queue_repo
        .expect_create_queue_entry()
        .withf(|name, priority, _| name.as_str() == "high" && *priority == QueuePriority::High)
        .returning({
            let high = high.clone();
            move |_, _, _| Ok(high.clone())
        });
    ctx.queue_repo
        .expect_list_for_update()
        .returning(move || Ok(vec![normal.clone(), high.clone()]));
    ctx.queue_repo
        .expect_update_queue_number()
        .times(2)
        .returning(|_, _| Ok(()));

    let assignments = add_patient_flow(&mut ctx, "high", QueuePriority::High, arrival(5))
        .await
        .expect("add should succeed");

    assert_eq!(assignment_for(&assignments, high_id), Some(1));
    assert_eq!(assignment_for(&assignments, normal_id), Some(2));
}

#[tokio::test]
async fn test_leaving_waiting_resets_the_number() {
    let mut ctx = TestContext::new();

    // The head entry was just moved to With Doctor but still carries 1.
    let with_doctor = db_queue_entry("seen", "Normal", "With Doctor", 1, arrival(0));
    let waiting = db_queue_entry("waiting", "Normal", "Waiting", 2, arrival(5));
    let with_doctor_id = with_doctor.id;
    let waiting_id = waiting.id;

    ctx.queue_repo
        .expect_list_for_update()
        .returning(move || Ok(vec![with_doctor.clone(), waiting.clone()]));
    ctx.queue_repo
        .expect_update_queue_number()
        .times(2)
        .returning(|_, _| Ok(()));

    let assignments = reorder_flow(&mut ctx).await.expect("reorder should succeed");

    assert_eq!(assignment_for(&assignments, with_doctor_id), Some(0));
    assert_eq!(assignment_for(&assignments, waiting_id), Some(1));
}

#[tokio::test]
async fn test_settled_queue_writes_nothing() {
    let mut ctx = TestContext::new();

    let first = db_queue_entry("first", "High", "Waiting", 1, arrival(5));
    let second = db_queue_entry("second", "Normal", "Waiting", 2, arrival(0));
    let done = db_queue_entry("done", "Normal", "Completed", 0, arrival(10));

    ctx.queue_repo
        .expect_list_for_update()
        .returning(move || Ok(vec![first.clone(), second.clone(), done.clone()]));
    ctx.queue_repo.expect_update_queue_number().times(0);

    let assignments = reorder_flow(&mut ctx).await.expect("reorder should succeed");
    assert!(assignments.is_empty());
}

#[tokio::test]
async fn test_delete_closes_the_gap() {
    let mut ctx = TestContext::new();

    // The High head was deleted; the remaining Normal still carries 2.
    let remaining = db_queue_entry("normal", "Normal", "Waiting", 2, arrival(0));
    let remaining_id = remaining.id;

    ctx.queue_repo
        .expect_delete_queue_entry()
        .with(predicate::always())
        .returning(|_| Ok(true));
    ctx.queue_repo
        .expect_list_for_update()
        .returning(move || Ok(vec![remaining.clone()]));
    ctx.queue_repo
        .expect_update_queue_number()
        .with(predicate::eq(remaining_id), predicate::eq(1))
        .times(1)
        .returning(|_, _| Ok(()));

    let deleted = ctx
        .queue_repo
        .delete_queue_entry(Uuid::new_v4())
        .await
        .expect("delete should succeed");
    assert!(deleted);

    let assignments = reorder_flow(&mut ctx).await.expect("reorder should succeed");
    assert_eq!(assignment_for(&assignments, remaining_id), Some(1));
}

#[tokio::test]
async fn test_priority_bump_reorders_live() {
    let mut ctx = TestContext::new();

    let first = db_queue_entry("first", "Normal", "Waiting", 1, arrival(0));
    // Second in line was just bumped to High.
    let bumped = db_queue_entry("bumped", "High", "Waiting", 2, arrival(5));
    let first_id = first.id;
    let bumped_id = bumped.id;

    ctx.queue_repo
        .expect_update_priority()
        .with(predicate::eq(bumped_id), predicate::eq(QueuePriority::High))
        .returning({
            let bumped = bumped.clone();
            move |_, _| Ok(bumped.clone())
        });
    ctx.queue_repo
        .expect_list_for_update()
        .returning(move || Ok(vec![first.clone(), bumped.clone()]));
    ctx.queue_repo
        .expect_update_queue_number()
        .times(2)
        .returning(|_, _| Ok(()));

    let updated = ctx
        .queue_repo
        .update_priority(bumped_id, QueuePriority::High)
        .await
        .expect("priority update should succeed")
        .into_model()
        .expect("row should convert");
    assert_eq!(updated.priority, QueuePriority::High);
    assert_eq!(updated.status, QueueStatus::Waiting);

    let assignments = reorder_flow(&mut ctx).await.expect("reorder should succeed");
    assert_eq!(assignment_for(&assignments, bumped_id), Some(1));
    assert_eq!(assignment_for(&assignments, first_id), Some(2));
}
