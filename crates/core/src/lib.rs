//! # ClinicDesk Core
//!
//! Domain layer for the ClinicDesk front-desk service. This crate holds the
//! entity models, the error taxonomy, and the three engines the API layer
//! orchestrates:
//!
//! - **Scheduling**: time normalization, working-hours validation, and the
//!   booking-buffer conflict policy for appointments.
//! - **Availability**: free/busy projection for a doctor and the dashboard
//!   status cards.
//! - **Queue ordering**: deterministic numbering of the walk-in queue.
//!
//! Everything here is pure logic over in-memory values; persistence lives in
//! `clinicdesk-db` and HTTP concerns in `clinicdesk-api`.

/// Free/busy projection and dashboard status cards
pub mod availability;
/// Injectable time source
pub mod clock;
/// Error taxonomy shared across the workspace
pub mod errors;
/// Entity models and request/response types
pub mod models;
/// Walk-in queue numbering
pub mod queue_order;
/// Appointment validation and conflict policy
pub mod scheduling;
