//! # Doctor Availability Projector
//!
//! Derives a doctor's live status from their Booked appointments and the
//! current instant. Two projections exist: the schedule view (free/busy plus
//! minutes until free and the upcoming list) and the dashboard card
//! ("Available" / "Busy" / "Not Available" with front-desk phrasing).
//!
//! The card keeps the decision order of the front desk: the busy check runs
//! before any free-window phrasing.

use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::models::appointment::Appointment;
use crate::models::doctor::{Doctor, DoctorStatus, Weekday};
use crate::scheduling::APPOINTMENT_DURATION_MINUTES;

/// Free/busy projection for one doctor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleStatus {
    pub is_free_now: bool,
    /// Minutes until the doctor frees up when busy, or until the next
    /// appointment starts when free; 0 with nothing upcoming.
    pub time_until_free_minutes: i64,
    pub upcoming: Vec<Appointment>,
}

fn appointment_duration() -> Duration {
    Duration::minutes(APPOINTMENT_DURATION_MINUTES)
}

/// Minutes left in `span`, rounded up; never negative.
fn ceil_minutes(span: Duration) -> i64 {
    let secs = span.num_seconds();
    if secs <= 0 { 0 } else { (secs + 59) / 60 }
}

/// Projects the schedule view from the doctor's Booked appointments.
///
/// The input must include any appointment whose interval has not yet ended
/// (`time_slot > now - duration`), not just slots starting in the future; an
/// in-progress visit is what makes the doctor busy. Order does not matter,
/// the projector sorts.
pub fn doctor_status(mut appointments: Vec<Appointment>, now: DateTime<Utc>) -> ScheduleStatus {
    let duration = appointment_duration();
    appointments.retain(|a| a.time_slot + duration > now);
    appointments.sort_by_key(|a| a.time_slot);

    let (is_free_now, time_until_free_minutes) = match appointments.first() {
        // In progress: free once the running visit ends.
        Some(first) if first.time_slot <= now => {
            (false, ceil_minutes(first.time_slot + duration - now))
        }
        // Free until the next visit starts.
        Some(first) => (true, ceil_minutes(first.time_slot - now)),
        None => (true, 0),
    };

    ScheduleStatus {
        is_free_now,
        time_until_free_minutes,
        upcoming: appointments,
    }
}

/// Dashboard card for one doctor given today's Booked appointments
/// (doctor-local "today").
pub fn project_card(
    doctor: &Doctor,
    todays_booked: &[Appointment],
    now: DateTime<Utc>,
) -> (DoctorStatus, String) {
    let local_now = now.with_timezone(&doctor.tz());
    let today = Weekday::from_chrono(local_now.weekday());

    if !doctor.available_days.contains(&today) {
        // Fixed display convention for the dashboard, not the actual
        // working-hours start.
        let label = doctor
            .available_days
            .iter()
            .min_by_key(|day| today.days_until(**day))
            .map(|day| format!("Next {day} at 09:00 AM"))
            .unwrap_or_else(|| "Not Available".to_string());
        return (DoctorStatus::NotAvailable, label);
    }

    let duration = appointment_duration();
    let mut sorted: Vec<&Appointment> = todays_booked.iter().collect();
    sorted.sort_by_key(|a| a.time_slot);

    if let Some(current) = sorted
        .iter()
        .find(|a| a.time_slot <= now && now < a.time_slot + duration)
    {
        let minutes = ceil_minutes(current.time_slot + duration - now);
        return (DoctorStatus::Busy, format!("Free in {minutes} minutes"));
    }

    if let Some(next) = sorted.iter().find(|a| a.time_slot > now) {
        let minutes = ceil_minutes(next.time_slot - now);
        return (
            DoctorStatus::Available,
            format!("Free for next {minutes} minutes"),
        );
    }

    (DoctorStatus::Available, "Available now".to_string())
}

/// UTC bounds of the doctor-local calendar day containing `now`. The start is
/// `now` minus the local time-of-day, so no timezone arithmetic on naive
/// values is needed.
pub fn local_day_bounds(tz: Tz, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let local_now = now.with_timezone(&tz);
    let since_midnight = local_now.time().signed_duration_since(NaiveTime::MIN);
    let start = now - since_midnight;
    (start, start + Duration::days(1))
}
