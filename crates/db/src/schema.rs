use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create doctors table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS doctors (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            specialization VARCHAR(255) NOT NULL,
            gender VARCHAR(32) NOT NULL,
            location VARCHAR(255) NOT NULL,
            timezone VARCHAR(64) NOT NULL DEFAULT 'UTC',
            available_days JSONB NOT NULL DEFAULT '[]',
            working_hours JSONB NOT NULL DEFAULT '{}',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create appointments table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS appointments (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            patient_name VARCHAR(255) NOT NULL,
            doctor_id UUID NOT NULL REFERENCES doctors(id),
            time_slot TIMESTAMP WITH TIME ZONE NOT NULL,
            status VARCHAR(32) NOT NULL DEFAULT 'Booked',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create queue_entries table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS queue_entries (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            patient_name VARCHAR(255) NOT NULL,
            priority VARCHAR(16) NOT NULL DEFAULT 'Normal',
            status VARCHAR(32) NOT NULL DEFAULT 'Waiting',
            queue_number INTEGER NOT NULL DEFAULT 0,
            arrival_time TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    for statement in [
        "CREATE INDEX IF NOT EXISTS idx_appointments_doctor_id ON appointments(doctor_id)",
        "CREATE INDEX IF NOT EXISTS idx_appointments_time_slot ON appointments(time_slot)",
        "CREATE INDEX IF NOT EXISTS idx_appointments_status ON appointments(status)",
        "CREATE INDEX IF NOT EXISTS idx_appointments_patient_name ON appointments(patient_name)",
        "CREATE INDEX IF NOT EXISTS idx_queue_entries_status ON queue_entries(status)",
        "CREATE INDEX IF NOT EXISTS idx_queue_entries_queue_number ON queue_entries(queue_number)",
    ] {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
