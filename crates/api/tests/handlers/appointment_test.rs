use chrono::{DateTime, Utc};
use mockall::predicate;
use pretty_assertions::assert_eq;
use uuid::Uuid;

use clinicdesk_api::middleware::error_handling::AppError;
use clinicdesk_core::errors::ClinicError;
use clinicdesk_core::models::appointment::{
    Appointment, AppointmentStatus, BookAppointmentRequest,
};
use clinicdesk_core::models::doctor::Doctor;
use clinicdesk_core::scheduling::{self, ScheduleError};

use crate::test_utils::{db_appointment, db_doctor, fixed_now, monday_slot, TestContext};

// Drives the booking pipeline against the mock repositories, mirroring the
// handler: look up the doctor, normalize and validate the slot, scan the
// conflict window, then create.
async fn book_flow(
    ctx: &mut TestContext,
    request: BookAppointmentRequest,
    now: DateTime<Utc>,
) -> Result<Appointment, AppError> {
    let doctor: Doctor = ctx
        .doctor_repo
        .get_doctor_by_id(request.doctor_id)
        .await?
        .ok_or(ScheduleError::DoctorNotFound)?
        .into();

    let slot = scheduling::normalize_time(&request.time_slot)?;
    scheduling::validate_slot(&doctor, slot, now)?;

    let (from, to) = scheduling::conflict_window(slot);
    let clashes = ctx
        .appointment_repo
        .find_booked_in_window(doctor.id, from, to, None)
        .await?;
    if !clashes.is_empty() {
        return Err(ScheduleError::Conflict.into());
    }

    let created = ctx
        .appointment_repo
        .create_appointment(request.patient_name.clone(), doctor.id, slot, now)
        .await?;

    Ok(created.into_model()?)
}

// Mirrors the status handler's revert-to-Booked path: conflict scan
// excluding the appointment itself, then the past-time check.
async fn revert_to_booked_flow(
    ctx: &mut TestContext,
    id: Uuid,
    now: DateTime<Utc>,
) -> Result<Appointment, AppError> {
    let appointment = ctx
        .appointment_repo
        .get_appointment_by_id(id)
        .await?
        .ok_or_else(|| ClinicError::NotFound("Appointment not found".to_string()))?
        .into_model()?;

    let (from, to) = scheduling::conflict_window(appointment.time_slot);
    let clashes = ctx
        .appointment_repo
        .find_booked_in_window(appointment.doctor_id, from, to, Some(appointment.id))
        .await?;
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

    Ok(ctx
        .appointment_repo
        .update_status(id, AppointmentStatus::Booked)
        .await?
        .into_model()?)
}

fn book_request(doctor_id: Uuid, time_slot: &str) -> BookAppointmentRequest {
    BookAppointmentRequest {
        patient_name: "John Smith".to_string(),
        doctor_id,
        time_slot: time_slot.to_string(),
    }
}

#[tokio::test]
async fn test_book_success() {
    let mut ctx = TestContext::new();
    let doctor = db_doctor("UTC");
    let doctor_id = doctor.id;
    let slot = monday_slot(10, 0);

    ctx.doctor_repo
        .expect_get_doctor_by_id()
        .with(predicate::eq(doctor_id))
        .returning(move |_| Ok(Some(doctor.clone())));
    ctx.appointment_repo
        .expect_find_booked_in_window()
        .returning(|_, _, _, _| Ok(Vec::new()));
    ctx.appointment_repo
        .expect_create_appointment()
        .returning(move |name, doctor_id, time_slot, _| {
            let mut row = db_appointment(doctor_id, time_slot, "Booked");
            row.patient_name = name;
            Ok(row)
        });

    let result = book_flow(&mut ctx, book_request(doctor_id, "2026-09-07T10:00:00Z"), fixed_now())
        .await
        .expect("booking should succeed");

    assert_eq!(result.status, AppointmentStatus::Booked);
    assert_eq!(result.doctor_id, doctor_id);
    assert_eq!(result.time_slot, slot);
}

#[tokio::test]
async fn test_book_unknown_doctor_is_not_found() {
    let mut ctx = TestContext::new();
    ctx.doctor_repo
        .expect_get_doctor_by_id()
        .returning(|_| Ok(None));

    let err = book_flow(
        &mut ctx,
        book_request(Uuid::new_v4(), "2026-09-07T10:00:00Z"),
        fixed_now(),
    )
    .await
    .expect_err("missing doctor must fail");

    assert!(matches!(err.0, ClinicError::NotFound(_)));
}

#[tokio::test]
async fn test_book_unparseable_time_is_validation_error() {
    let mut ctx = TestContext::new();
    let doctor = db_doctor("UTC");
    let doctor_id = doctor.id;

    ctx.doctor_repo
        .expect_get_doctor_by_id()
        .returning(move |_| Ok(Some(doctor.clone())));

    let err = book_flow(&mut ctx, book_request(doctor_id, "not-a-time"), fixed_now())
        .await
        .expect_err("garbage time must fail");

    assert!(matches!(err.0, ClinicError::Validation(_)));
}

#[tokio::test]
async fn test_book_past_time_is_rejected() {
    let mut ctx = TestContext::new();
    let doctor = db_doctor("UTC");
    let doctor_id = doctor.id;

    ctx.doctor_repo
        .expect_get_doctor_by_id()
        .returning(move |_| Ok(Some(doctor.clone())));

    // Monday 2026-08-31 predates the fixed clock.
    let err = book_flow(
        &mut ctx,
        book_request(doctor_id, "2026-08-31T10:00:00Z"),
        fixed_now(),
    )
    .await
    .expect_err("past slot must fail");

    assert_eq!(
        err.0.to_string(),
        "Conflict: Cannot book an appointment in the past."
    );
}

#[tokio::test]
async fn test_book_unavailable_day_is_rejected() {
    let mut ctx = TestContext::new();
    let doctor = db_doctor("UTC");
    let doctor_id = doctor.id;

    ctx.doctor_repo
        .expect_get_doctor_by_id()
        .returning(move |_| Ok(Some(doctor.clone())));

    // 2026-09-06 is a Sunday; the fixture doctor works Mondays.
    let err = book_flow(
        &mut ctx,
        book_request(doctor_id, "2026-09-06T10:00:00Z"),
        fixed_now(),
    )
    .await
    .expect_err("off-day slot must fail");

    assert!(err.0.to_string().contains("not available on Sunday"));
}

#[tokio::test]
async fn test_book_inside_buffer_is_conflict() {
    let mut ctx = TestContext::new();
    let doctor = db_doctor("UTC");
    let doctor_id = doctor.id;
    let existing = db_appointment(doctor_id, monday_slot(10, 0), "Booked");

    ctx.doctor_repo
        .expect_get_doctor_by_id()
        .returning(move |_| Ok(Some(doctor.clone())));
    ctx.appointment_repo
        .expect_find_booked_in_window()
        .returning(move |_, _, _, _| Ok(vec![existing.clone()]));

    // 10:20 sits 20 minutes from the existing 10:00 booking.
    let err = book_flow(
        &mut ctx,
        book_request(doctor_id, "2026-09-07T10:20:00Z"),
        fixed_now(),
    )
    .await
    .expect_err("slot inside the buffer must clash");

    assert!(err
        .0
        .to_string()
        .contains("conflicts with another appointment"));
}

#[tokio::test]
async fn test_book_one_buffer_away_succeeds() {
    let mut ctx = TestContext::new();
    let doctor = db_doctor("UTC");
    let doctor_id = doctor.id;

    ctx.doctor_repo
        .expect_get_doctor_by_id()
        .returning(move |_| Ok(Some(doctor.clone())));
    // The open-interval window query returns nothing for a slot exactly 30
    // minutes away from an existing booking.
    ctx.appointment_repo
        .expect_find_booked_in_window()
        .returning(|_, _, _, _| Ok(Vec::new()));
    ctx.appointment_repo
        .expect_create_appointment()
        .returning(move |name, doctor_id, time_slot, _| {
            let mut row = db_appointment(doctor_id, time_slot, "Booked");
            row.patient_name = name;
            Ok(row)
        });

    let result = book_flow(
        &mut ctx,
        book_request(doctor_id, "2026-09-07T10:31:00Z"),
        fixed_now(),
    )
    .await
    .expect("slot beyond the buffer should book");

    assert_eq!(result.time_slot, monday_slot(10, 31));
}

#[tokio::test]
async fn test_revert_to_booked_with_clash_is_rejected() {
    let mut ctx = TestContext::new();
    let doctor_id = Uuid::new_v4();
    let appointment = db_appointment(doctor_id, monday_slot(10, 0), "Cancelled");
    let id = appointment.id;
    let clash = db_appointment(doctor_id, monday_slot(10, 15), "Booked");

    ctx.appointment_repo
        .expect_get_appointment_by_id()
        .with(predicate::eq(id))
        .returning(move |_| Ok(Some(appointment.clone())));
    ctx.appointment_repo
        .expect_find_booked_in_window()
        .withf(move |_, _, _, exclude| *exclude == Some(id))
        .returning(move |_, _, _, _| Ok(vec![clash.clone()]));

    let err = revert_to_booked_flow(&mut ctx, id, fixed_now())
        .await
        .expect_err("revert into a clash must fail");

    assert!(err.0.to_string().contains("already booked around this time"));
}

#[tokio::test]
async fn test_revert_to_booked_past_slot_is_rejected() {
    let mut ctx = TestContext::new();
    let doctor_id = Uuid::new_v4();
    let appointment = db_appointment(doctor_id, monday_slot(10, 0), "Cancelled");
    let id = appointment.id;

    ctx.appointment_repo
        .expect_get_appointment_by_id()
        .returning(move |_| Ok(Some(appointment.clone())));
    ctx.appointment_repo
        .expect_find_booked_in_window()
        .returning(|_, _, _, _| Ok(Vec::new()));

    // The clock has moved past the appointment's slot.
    let err = revert_to_booked_flow(&mut ctx, id, monday_slot(12, 0))
        .await
        .expect_err("reverting a past slot must fail");

    assert_eq!(
        err.0.to_string(),
        "Conflict: Cannot revert to booked for a past time."
    );
}

#[tokio::test]
async fn test_revert_to_booked_success() {
    let mut ctx = TestContext::new();
    let doctor_id = Uuid::new_v4();
    let appointment = db_appointment(doctor_id, monday_slot(10, 0), "Cancelled");
    let id = appointment.id;

    ctx.appointment_repo
        .expect_get_appointment_by_id()
        .returning(move |_| Ok(Some(appointment.clone())));
    ctx.appointment_repo
        .expect_find_booked_in_window()
        .returning(|_, _, _, _| Ok(Vec::new()));
    ctx.appointment_repo
        .expect_update_status()
        .with(predicate::eq(id), predicate::eq(AppointmentStatus::Booked))
        .returning(move |id, status| {
            let mut row = db_appointment(doctor_id, monday_slot(10, 0), &status.to_string());
            row.id = id;
            Ok(row)
        });

    let result = revert_to_booked_flow(&mut ctx, id, fixed_now())
        .await
        .expect("clean revert should succeed");

    assert_eq!(result.status, AppointmentStatus::Booked);
}

#[tokio::test]
async fn test_revert_missing_appointment_is_not_found() {
    let mut ctx = TestContext::new();
    ctx.appointment_repo
        .expect_get_appointment_by_id()
        .returning(|_| Ok(None));

    let err = revert_to_booked_flow(&mut ctx, Uuid::new_v4(), fixed_now())
        .await
        .expect_err("missing appointment must fail");

    assert!(matches!(err.0, ClinicError::NotFound(_)));
}
