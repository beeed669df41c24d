use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{ClinicError, ClinicResult};

/// Calendar weekday, serialized with the full English name ("Monday") as the
/// dashboard and stored records spell it. Ordering follows the Sunday-first
/// calendar week.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Sunday,
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    pub fn from_chrono(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Sun => Weekday::Sunday,
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
            chrono::Weekday::Sat => Weekday::Saturday,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Weekday::Sunday => "Sunday",
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
        }
    }

    fn index(&self) -> u32 {
        Weekday::ALL.iter().position(|d| d == self).unwrap_or(0) as u32
    }

    /// Days from `self` to `other` walking forward through the week, always in
    /// `1..=7` (the same day counts as a full week away).
    pub fn days_until(&self, other: Weekday) -> u32 {
        (other.index() + 7 - self.index() - 1) % 7 + 1
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Daily working-hours window. `start` is inclusive, `end` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoursSpan {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: Uuid,
    pub name: String,
    pub specialization: String,
    pub gender: String,
    pub location: String,
    /// IANA zone name carrying the practice-local civil time. Appointments
    /// themselves are always stored as UTC instants.
    pub timezone: String,
    pub available_days: BTreeSet<Weekday>,
    pub working_hours: BTreeMap<Weekday, HoursSpan>,
    pub created_at: DateTime<Utc>,
}

impl Doctor {
    /// Parsed practice timezone. The zone name is validated at create/update
    /// time, so the UTC fallback is not reachable through the API.
    pub fn tz(&self) -> chrono_tz::Tz {
        self.timezone.parse().unwrap_or(chrono_tz::Tz::UTC)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDoctorRequest {
    pub name: String,
    pub specialization: String,
    pub gender: String,
    pub location: String,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    pub available_days: BTreeSet<Weekday>,
    pub working_hours: BTreeMap<Weekday, HoursSpan>,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl CreateDoctorRequest {
    pub fn validate(&self) -> ClinicResult<()> {
        if self.name.trim().is_empty() {
            return Err(ClinicError::Validation(
                "Doctor name must not be empty".to_string(),
            ));
        }
        validate_timezone(&self.timezone)?;
        validate_calendar(&self.available_days, &self.working_hours)
    }
}

/// Explicit per-field update request; only these fields are mutable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDoctorRequest {
    pub name: Option<String>,
    pub specialization: Option<String>,
    pub gender: Option<String>,
    pub location: Option<String>,
    pub timezone: Option<String>,
    pub available_days: Option<BTreeSet<Weekday>>,
    pub working_hours: Option<BTreeMap<Weekday, HoursSpan>>,
}

impl UpdateDoctorRequest {
    /// Folds the requested changes into `doctor`. The merged record is
    /// re-validated as a whole so partial updates cannot break the
    /// days/hours invariant.
    pub fn apply(self, doctor: &mut Doctor) -> ClinicResult<()> {
        if let Some(name) = self.name {
            if name.trim().is_empty() {
                return Err(ClinicError::Validation(
                    "Doctor name must not be empty".to_string(),
                ));
            }
            doctor.name = name;
        }
        if let Some(specialization) = self.specialization {
            doctor.specialization = specialization;
        }
        if let Some(gender) = self.gender {
            doctor.gender = gender;
        }
        if let Some(location) = self.location {
            doctor.location = location;
        }
        if let Some(timezone) = self.timezone {
            validate_timezone(&timezone)?;
            doctor.timezone = timezone;
        }
        if let Some(available_days) = self.available_days {
            doctor.available_days = available_days;
        }
        if let Some(working_hours) = self.working_hours {
            doctor.working_hours = working_hours;
        }
        validate_calendar(&doctor.available_days, &doctor.working_hours)
    }
}

fn validate_timezone(timezone: &str) -> ClinicResult<()> {
    timezone
        .parse::<chrono_tz::Tz>()
        .map(|_| ())
        .map_err(|_| ClinicError::Validation(format!("Unknown timezone: {timezone}")))
}

/// Every available day needs a working-hours window with `start < end`, and
/// windows may only exist for available days.
pub fn validate_calendar(
    available_days: &BTreeSet<Weekday>,
    working_hours: &BTreeMap<Weekday, HoursSpan>,
) -> ClinicResult<()> {
    for day in available_days {
        match working_hours.get(day) {
            None => {
                return Err(ClinicError::Validation(format!(
                    "No working hours set for available day {day}"
                )));
            }
            Some(span) if span.start >= span.end => {
                return Err(ClinicError::Validation(format!(
                    "Working hours for {day} must start before they end"
                )));
            }
            Some(_) => {}
        }
    }
    if let Some(day) = working_hours.keys().find(|d| !available_days.contains(d)) {
        return Err(ClinicError::Validation(format!(
            "Working hours set for unavailable day {day}"
        )));
    }
    Ok(())
}

/// Live dashboard status for a doctor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DoctorStatus {
    Available,
    Busy,
    #[serde(rename = "Not Available")]
    NotAvailable,
}

impl fmt::Display for DoctorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DoctorStatus::Available => "Available",
            DoctorStatus::Busy => "Busy",
            DoctorStatus::NotAvailable => "Not Available",
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorWithStatus {
    #[serde(flatten)]
    pub doctor: Doctor,
    pub status: DoctorStatus,
    pub next_available: String,
}
