pub mod appointment;
pub mod doctor;
pub mod health;
pub mod queue;
