//! Table bootstrap for the PostgreSQL backend.

use sqlx_postgres::PgPool;
use tracing::{info, instrument};

use crate::error::Result;

const CREATE_PATIENTS: &str = r#"
CREATE TABLE IF NOT EXISTS patients (
    id BIGSERIAL PRIMARY KEY,
    first_name_th TEXT NOT NULL,
    middle_name_th TEXT,
    last_name_th TEXT NOT NULL,
    first_name_en TEXT,
    middle_name_en TEXT,
    last_name_en TEXT,
    date_of_birth DATE NOT NULL,
    patient_hn TEXT UNIQUE,
    national_id TEXT UNIQUE,
    passport_id TEXT UNIQUE,
    phone_number TEXT NOT NULL,
    email TEXT,
    gender TEXT NOT NULL CHECK (gender IN ('M', 'F')),
    hospital TEXT NOT NULL
)
"#;

const CREATE_STAFFS: &str = r#"
CREATE TABLE IF NOT EXISTS staffs (
    id BIGSERIAL PRIMARY KEY,
    username TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    hospital TEXT NOT NULL
)
"#;

/// Creates the `patients` and `staffs` tables when they do not exist.
#[instrument(skip(pool))]
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    for statement in [CREATE_PATIENTS, CREATE_STAFFS] {
        sqlx_core::query::query(statement).execute(pool).await?;
    }
    info!("PostgreSQL schema ready");
    Ok(())
}
