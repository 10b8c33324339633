//! Persistence boundary for feed ingestion
//!
//! Three write operations (`create_job`, `update_job`, `insert_records`)
//! plus the job status read. Each call is independent and atomic on its own;
//! nothing here spans a transaction across calls. The engine components
//! depend on the trait, not on PostgreSQL, which is also what lets the
//! workflow tests run against an in-memory store.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use thiserror::Error;

use super::models::{CanonicalRecord, IngestionJob, JobStatus};

/// Errors surfaced by the persistence boundary
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Write rejected: {0}")]
    Rejected(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Database(err.to_string())
    }
}

/// Durable storage operations required by the ingestion engine
#[async_trait]
pub trait IngestStore: Send + Sync {
    /// Persist a new job row and return its store-assigned id.
    async fn create_job(&self, provider: &str, file_name: &str) -> Result<i64, StoreError>;

    /// Overwrite a job's status/finished flag and bump its update timestamp.
    async fn update_job(
        &self,
        job_id: i64,
        status: JobStatus,
        finished: bool,
    ) -> Result<(), StoreError>;

    /// Insert one batch of canonical records as a single atomic statement.
    async fn insert_records(&self, batch: &[CanonicalRecord]) -> Result<(), StoreError>;

    /// Fetch a job by id.
    async fn get_job(&self, job_id: i64) -> Result<Option<IngestionJob>, StoreError>;
}

/// PostgreSQL-backed store
#[derive(Debug, Clone)]
pub struct PgIngestStore {
    pool: PgPool,
}

impl PgIngestStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IngestStore for PgIngestStore {
    async fn create_job(&self, provider: &str, file_name: &str) -> Result<i64, StoreError> {
        let now = Utc::now();
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO ingestion_jobs (provider, file_name, status, finished, started_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING id
            "#,
        )
        .bind(provider)
        .bind(file_name)
        .bind(JobStatus::Started.as_str())
        .bind(false)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn update_job(
        &self,
        job_id: i64,
        status: JobStatus,
        finished: bool,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE ingestion_jobs
            SET status = $1, finished = $2, updated_at = $3
            WHERE id = $4
            "#,
        )
        .bind(status.as_str())
        .bind(finished)
        .bind(Utc::now())
        .bind(job_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn insert_records(&self, batch: &[CanonicalRecord]) -> Result<(), StoreError> {
        if batch.is_empty() {
            return Ok(());
        }

        // One multi-row VALUES statement per batch keeps the batch atomic.
        // Callers chunk to the configured batch size, which stays far below
        // the PostgreSQL bind-parameter limit at 10 columns per row.
        let mut query_builder = sqlx::QueryBuilder::new(
            "INSERT INTO vehicle_records \
             (uuid, vin, make, model, mileage, year, price, zip_code, create_date, update_date) ",
        );

        query_builder.push_values(batch, |mut b, record| {
            b.push_bind(&record.uuid)
                .push_bind(&record.vin)
                .push_bind(&record.make)
                .push_bind(&record.model)
                .push_bind(&record.mileage)
                .push_bind(&record.year)
                .push_bind(&record.price)
                .push_bind(&record.zip_code)
                .push_bind(&record.create_date)
                .push_bind(&record.update_date);
        });

        query_builder.build().execute(&self.pool).await?;

        Ok(())
    }

    async fn get_job(&self, job_id: i64) -> Result<Option<IngestionJob>, StoreError> {
        let job = sqlx::query_as::<_, IngestionJob>(
            r#"
            SELECT id, provider, file_name, status, finished, started_at, updated_at
            FROM ingestion_jobs
            WHERE id = $1
            "#,
        )
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(job)
    }
}
