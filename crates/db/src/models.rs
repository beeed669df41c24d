use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use eyre::Result;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

use clinicdesk_core::models::appointment::{Appointment, AppointmentStatus};
use clinicdesk_core::models::doctor::{Doctor, HoursSpan, Weekday};
use clinicdesk_core::models::queue::{QueueEntry, QueuePriority, QueueStatus};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbDoctor {
    pub id: Uuid,
    pub name: String,
    pub specialization: String,
    pub gender: String,
    pub location: String,
    pub timezone: String,
    pub available_days: Json<BTreeSet<Weekday>>,
    pub working_hours: Json<BTreeMap<Weekday, HoursSpan>>,
    pub created_at: DateTime<Utc>,
}

impl From<DbDoctor> for Doctor {
    fn from(row: DbDoctor) -> Self {
        Doctor {
            id: row.id,
            name: row.name,
            specialization: row.specialization,
            gender: row.gender,
            location: row.location,
            timezone: row.timezone,
            available_days: row.available_days.0,
            working_hours: row.working_hours.0,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAppointment {
    pub id: Uuid,
    pub patient_name: String,
    pub doctor_id: Uuid,
    pub time_slot: DateTime<Utc>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl DbAppointment {
    pub fn into_model(self) -> Result<Appointment> {
        let status = AppointmentStatus::from_str(&self.status)
            .map_err(|e| eyre::eyre!(e.to_string()))?;
        Ok(Appointment {
            id: self.id,
            patient_name: self.patient_name,
            doctor_id: self.doctor_id,
            time_slot: self.time_slot,
            status,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbQueueEntry {
    pub id: Uuid,
    pub patient_name: String,
    pub priority: String,
    pub status: String,
    pub queue_number: i32,
    pub arrival_time: DateTime<Utc>,
}

impl DbQueueEntry {
    pub fn into_model(self) -> Result<QueueEntry> {
        let priority =
            QueuePriority::from_str(&self.priority).map_err(|e| eyre::eyre!(e.to_string()))?;
        let status =
            QueueStatus::from_str(&self.status).map_err(|e| eyre::eyre!(e.to_string()))?;
        Ok(QueueEntry {
            id: self.id,
            patient_name: self.patient_name,
            priority,
            status,
            queue_number: self.queue_number,
            arrival_time: self.arrival_time,
        })
    }
}
