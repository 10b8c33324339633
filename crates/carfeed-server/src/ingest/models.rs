//! Core types for feed ingestion

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One normalized vehicle listing row, ready for storage.
///
/// Every field is independently nullable: a column absent from the source
/// layout, or present but empty in a row, maps to `None` — never to an
/// error. The numeric-looking fields (`mileage`, `year`, `price`,
/// `zip_code`) are carried as raw text; this layer does not validate or
/// coerce them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    pub uuid: Option<String>,
    pub vin: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub mileage: Option<String>,
    pub year: Option<String>,
    pub price: Option<String>,
    pub zip_code: Option<String>,
    pub create_date: Option<String>,
    pub update_date: Option<String>,
}

/// Ingestion job status
///
/// A job is created as `Started` and transitions exactly once to a terminal
/// status. `Cancelled` is part of the stored vocabulary but no operation in
/// this service produces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Started,
    Succeeded,
    Failed,
    Cancelled,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Started => "started",
            JobStatus::Succeeded => "succeeded",
            JobStatus::Failed => "failed",
            JobStatus::Cancelled => "cancelled",
        }
    }

    /// Terminal statuses are the only valid targets of a finish update.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobStatus::Started)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "started" => Ok(JobStatus::Started),
            "succeeded" => Ok(JobStatus::Succeeded),
            "failed" => Ok(JobStatus::Failed),
            "cancelled" => Ok(JobStatus::Cancelled),
            _ => Err(format!("unknown job status: {s}")),
        }
    }
}

/// Tracked ingestion job (maps to the ingestion_jobs table)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct IngestionJob {
    pub id: i64,
    pub provider: String,
    pub file_name: String,
    pub status: String,
    pub finished: bool,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_status_string_round_trip() {
        for status in [
            JobStatus::Started,
            JobStatus::Succeeded,
            JobStatus::Failed,
            JobStatus::Cancelled,
        ] {
            assert_eq!(JobStatus::from_str(status.as_str()), Ok(status));
        }
        assert!(JobStatus::from_str("running").is_err());
    }

    #[test]
    fn test_only_started_is_non_terminal() {
        assert!(!JobStatus::Started.is_terminal());
        assert!(JobStatus::Succeeded.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
        assert!(JobStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_canonical_record_defaults_to_all_null() {
        let record = CanonicalRecord::default();
        assert_eq!(record, CanonicalRecord { ..Default::default() });
        assert!(record.vin.is_none());
        assert!(record.price.is_none());
    }
}
