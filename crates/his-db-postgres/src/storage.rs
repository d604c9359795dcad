//! `PatientStorage` and `StaffStorage` on PostgreSQL.

use async_trait::async_trait;
use his_core::{Gender, NewStaff, PatientRecord, StaffAccount};
use his_search::Predicate;
use his_storage::{PatientStorage, StaffStorage, StorageError};
use sqlx_core::query::query;
use sqlx_core::row::Row;
use sqlx_postgres::{PgPool, PgRow};
use tracing::{debug, instrument, warn};

use crate::config::PostgresConfig;
use crate::error::{PostgresError, is_unique_violation};
use crate::pool::create_pool;
use crate::query::{SqlValue, build_patient_query};
use crate::schema::ensure_schema;

const STAFF_SELECT: &str = "SELECT id, username, password_hash, hospital FROM staffs";

/// PostgreSQL storage backend.
#[derive(Debug, Clone)]
pub struct PostgresStorage {
    pool: PgPool,
}

impl PostgresStorage {
    /// Connects using `config`, creating tables first when configured to.
    pub async fn new(config: PostgresConfig) -> crate::Result<Self> {
        let pool = create_pool(&config).await?;
        if config.run_migrations {
            ensure_schema(&pool).await?;
        }
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn db_error(err: sqlx_core::error::Error) -> StorageError {
    StorageError::from(PostgresError::from(err))
}

fn row_to_patient(row: &PgRow) -> Result<PatientRecord, PostgresError> {
    let gender: String = row.try_get("gender")?;
    let gender = gender
        .parse::<Gender>()
        .map_err(|e| PostgresError::row_mapping(e.to_string()))?;
    let text = |column: &str| -> Result<String, PostgresError> {
        Ok(row.try_get::<Option<String>, _>(column)?.unwrap_or_default())
    };

    Ok(PatientRecord {
        id: row.try_get("id")?,
        first_name_th: row.try_get("first_name_th")?,
        middle_name_th: text("middle_name_th")?,
        last_name_th: row.try_get("last_name_th")?,
        first_name_en: text("first_name_en")?,
        middle_name_en: text("middle_name_en")?,
        last_name_en: text("last_name_en")?,
        date_of_birth: row.try_get("date_of_birth")?,
        patient_hn: row.try_get("patient_hn")?,
        national_id: row.try_get("national_id")?,
        passport_id: row.try_get("passport_id")?,
        phone_number: row.try_get("phone_number")?,
        email: text("email")?,
        gender,
        hospital: row.try_get("hospital")?,
    })
}

fn row_to_staff(row: &PgRow) -> Result<StaffAccount, PostgresError> {
    Ok(StaffAccount {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        password_hash: row.try_get("password_hash")?,
        hospital: row.try_get("hospital")?,
    })
}

#[async_trait]
impl PatientStorage for PostgresStorage {
    #[instrument(skip_all, fields(clauses = predicate.len()))]
    async fn find(&self, predicate: &Predicate) -> Result<Vec<PatientRecord>, StorageError> {
        let built = build_patient_query(predicate)?;
        debug!(sql = %built.sql, params = built.params.len(), "Executing patient search");

        let mut sql_query = query(&built.sql);
        for param in &built.params {
            sql_query = match param {
                SqlValue::Text(s) => sql_query.bind(s.as_str()),
                SqlValue::Date(d) => sql_query.bind(*d),
            };
        }

        let rows = sql_query.fetch_all(&self.pool).await.map_err(db_error)?;
        rows.iter()
            .map(|row| row_to_patient(row).map_err(StorageError::from))
            .collect()
    }
}

#[async_trait]
impl StaffStorage for PostgresStorage {
    #[instrument(skip(self))]
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<StaffAccount>, StorageError> {
        let sql = format!("{STAFF_SELECT} WHERE username = $1");
        let row = query(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;
        row.as_ref()
            .map(row_to_staff)
            .transpose()
            .map_err(StorageError::from)
    }

    #[instrument(skip(self))]
    async fn find_by_credentials(
        &self,
        username: &str,
        hospital: &str,
    ) -> Result<Option<StaffAccount>, StorageError> {
        let sql = format!("{STAFF_SELECT} WHERE username = $1 AND hospital = $2");
        let row = query(&sql)
            .bind(username)
            .bind(hospital)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;
        row.as_ref()
            .map(row_to_staff)
            .transpose()
            .map_err(StorageError::from)
    }

    #[instrument(skip_all, fields(username = %staff.username))]
    async fn create(&self, staff: NewStaff) -> Result<StaffAccount, StorageError> {
        let row = query(
            "INSERT INTO staffs (username, password_hash, hospital) VALUES ($1, $2, $3) \
             RETURNING id, username, password_hash, hospital",
        )
        .bind(staff.username.as_str())
        .bind(staff.password_hash.as_str())
        .bind(staff.hospital.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StorageError::already_exists("staff", staff.username.as_str())
            } else {
                warn!(error = %e, "Failed to insert staff");
                db_error(e)
            }
        })?;
        row_to_staff(&row).map_err(StorageError::from)
    }
}
