use chrono::{DateTime, Utc};
use mockall::mock;
use uuid::Uuid;

use crate::models::{DbAppointment, DbDoctor, DbQueueEntry};
use clinicdesk_core::models::appointment::AppointmentStatus;
use clinicdesk_core::models::doctor::{CreateDoctorRequest, Doctor};
use clinicdesk_core::models::queue::{QueuePriority, QueueStatus};

// Mock repositories for testing
mock! {
    pub DoctorRepo {
        pub async fn create_doctor(
            &self,
            request: CreateDoctorRequest,
        ) -> eyre::Result<DbDoctor>;

        pub async fn get_doctor_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbDoctor>>;

        pub async fn list_doctors(&self) -> eyre::Result<Vec<DbDoctor>>;

        pub async fn update_doctor(
            &self,
            doctor: Doctor,
        ) -> eyre::Result<DbDoctor>;

        pub async fn delete_doctor(
            &self,
            id: Uuid,
        ) -> eyre::Result<bool>;
    }
}

mock! {
    pub AppointmentRepo {
        pub async fn create_appointment(
            &self,
            patient_name: String,
            doctor_id: Uuid,
            time_slot: DateTime<Utc>,
            now: DateTime<Utc>,
        ) -> eyre::Result<DbAppointment>;

        pub async fn get_appointment_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbAppointment>>;

        pub async fn list_appointments(&self) -> eyre::Result<Vec<DbAppointment>>;

        pub async fn find_booked_in_window(
            &self,
            doctor_id: Uuid,
            from: DateTime<Utc>,
            to: DateTime<Utc>,
            exclude: Option<Uuid>,
        ) -> eyre::Result<Vec<DbAppointment>>;

        pub async fn search_by_patient_name(
            &self,
            fragment: String,
        ) -> eyre::Result<Vec<DbAppointment>>;

        pub async fn update_status(
            &self,
            id: Uuid,
            status: AppointmentStatus,
        ) -> eyre::Result<DbAppointment>;

        pub async fn update_time_slot(
            &self,
            id: Uuid,
            time_slot: DateTime<Utc>,
        ) -> eyre::Result<DbAppointment>;
    }
}

mock! {
    pub QueueRepo {
        pub async fn create_queue_entry(
            &self,
            patient_name: String,
            priority: QueuePriority,
            now: DateTime<Utc>,
        ) -> eyre::Result<DbQueueEntry>;

        pub async fn get_queue_entry_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbQueueEntry>>;

        pub async fn list_queue(&self) -> eyre::Result<Vec<DbQueueEntry>>;

        pub async fn list_for_update(&self) -> eyre::Result<Vec<DbQueueEntry>>;

        pub async fn update_status(
            &self,
            id: Uuid,
            status: QueueStatus,
        ) -> eyre::Result<DbQueueEntry>;

        pub async fn update_priority(
            &self,
            id: Uuid,
            priority: QueuePriority,
        ) -> eyre::Result<DbQueueEntry>;

        pub async fn update_queue_number(
            &self,
            id: Uuid,
            queue_number: i32,
        ) -> eyre::Result<()>;

        pub async fn delete_queue_entry(
            &self,
            id: Uuid,
        ) -> eyre::Result<bool>;
    }
}
