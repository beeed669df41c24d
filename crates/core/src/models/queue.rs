use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ClinicError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueuePriority {
    #[default]
    Normal,
    High,
}

impl fmt::Display for QueuePriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            QueuePriority::Normal => "Normal",
            QueuePriority::High => "High",
        })
    }
}

impl FromStr for QueuePriority {
    type Err = ClinicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Normal" => Ok(QueuePriority::Normal),
            "High" => Ok(QueuePriority::High),
            other => Err(ClinicError::Validation(format!(
                "Unknown queue priority: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueueStatus {
    Waiting,
    #[serde(rename = "With Doctor")]
    WithDoctor,
    Completed,
}

impl fmt::Display for QueueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            QueueStatus::Waiting => "Waiting",
            QueueStatus::WithDoctor => "With Doctor",
            QueueStatus::Completed => "Completed",
        })
    }
}

impl FromStr for QueueStatus {
    type Err = ClinicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Waiting" => Ok(QueueStatus::Waiting),
            "With Doctor" => Ok(QueueStatus::WithDoctor),
            "Completed" => Ok(QueueStatus::Completed),
            other => Err(ClinicError::Validation(format!(
                "Unknown queue status: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueEntry {
    pub id: Uuid,
    pub patient_name: String,
    pub priority: QueuePriority,
    pub status: QueueStatus,
    /// Position in the waiting sequence, 1..N while `status` is Waiting and
    /// 0 otherwise.
    pub queue_number: i32,
    pub arrival_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddPatientRequest {
    pub patient_name: String,
    #[serde(default)]
    pub priority: QueuePriority,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateQueueStatusRequest {
    pub status: QueueStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateQueuePriorityRequest {
    pub priority: QueuePriority,
}
