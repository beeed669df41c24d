//! # Scheduling Engine
//!
//! Validation pipeline for booking and rescheduling appointments. The policy
//! decisions live here so every caller applies the same rules:
//!
//! - appointment instants are stored in UTC; only the weekday and
//!   working-hours checks convert to the doctor's civil time;
//! - two Booked appointments for one doctor conflict iff their slots are
//!   strictly closer than the booking buffer, symmetric and pairwise over the
//!   whole Booked set, never a sorted-neighbor shortcut;
//! - all checks are pure and run before the single persisting write.

use chrono::{DateTime, Datelike, Duration, NaiveDateTime, Utc};
use thiserror::Error;

use crate::errors::ClinicError;
use crate::models::doctor::{Doctor, Weekday};

/// Minimum separation between two Booked slots for the same doctor.
pub const BOOKING_BUFFER_MINUTES: i64 = 30;

/// How long a visit occupies the doctor. Same value as the buffer today, but
/// a distinct knob.
pub const APPOINTMENT_DURATION_MINUTES: i64 = 30;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Invalid timeSlot")]
    InvalidTimeSlot,

    #[error("Cannot book an appointment in the past.")]
    PastTime,

    #[error("Doctor is not available on {0}")]
    DayUnavailable(String),

    #[error("Doctor has no working hours set for {0}")]
    NoWorkingHours(String),

    #[error("Appointment time must be within working hours: {0}")]
    OutsideWorkingHours(String),

    #[error("Doctor not available at this time (conflicts with another appointment).")]
    Conflict,
}

impl From<ScheduleError> for ClinicError {
    fn from(err: ScheduleError) -> Self {
        match err {
            ScheduleError::DoctorNotFound => ClinicError::NotFound(err.to_string()),
            ScheduleError::InvalidTimeSlot => ClinicError::Validation(err.to_string()),
            ScheduleError::PastTime
            | ScheduleError::DayUnavailable(_)
            | ScheduleError::NoWorkingHours(_)
            | ScheduleError::OutsideWorkingHours(_)
            | ScheduleError::Conflict => ClinicError::Conflict(err.to_string()),
        }
    }
}

/// Parses a raw time representation into the canonical UTC instant. Accepts
/// RFC 3339 with any offset; a bare date-time without offset is read as UTC.
pub fn normalize_time(raw: &str) -> Result<DateTime<Utc>, ScheduleError> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc());
        }
    }
    Err(ScheduleError::InvalidTimeSlot)
}

/// Runs the calendar checks for a requested slot, in the order callers
/// surface them: past time, then day availability, then working hours.
/// The weekday and time-of-day are taken in the doctor's timezone; the start
/// of the window is inclusive, the end exclusive.
pub fn validate_slot(
    doctor: &Doctor,
    slot: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<(), ScheduleError> {
    if slot < now {
        return Err(ScheduleError::PastTime);
    }

    let local = slot.with_timezone(&doctor.tz());
    let day = Weekday::from_chrono(local.weekday());
    if !doctor.available_days.contains(&day) {
        return Err(ScheduleError::DayUnavailable(day.name().to_string()));
    }

    let hours = doctor
        .working_hours
        .get(&day)
        .ok_or_else(|| ScheduleError::NoWorkingHours(day.name().to_string()))?;

    let time_of_day = local.time();
    if time_of_day < hours.start || time_of_day >= hours.end {
        return Err(ScheduleError::OutsideWorkingHours(format!(
            "{} - {}",
            hours.start.format("%H:%M"),
            hours.end.format("%H:%M"),
        )));
    }

    Ok(())
}

/// Open interval scanned for clashing Booked appointments: a slot exactly one
/// buffer away does not conflict.
pub fn conflict_window(slot: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let buffer = Duration::minutes(BOOKING_BUFFER_MINUTES);
    (slot - buffer, slot + buffer)
}

/// The pairwise conflict policy itself: strictly closer than the buffer.
pub fn slots_conflict(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    (a - b).num_seconds().abs() < BOOKING_BUFFER_MINUTES * 60
}
