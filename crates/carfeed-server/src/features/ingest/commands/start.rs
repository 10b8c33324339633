//! Start ingestion command
//!
//! Validates the upload shape and hands the file to the workflow. The
//! response carries only the job id; the outcome of parsing and persistence
//! is observable through the job status endpoint.

use serde::{Deserialize, Serialize};

use crate::ingest::{IngestionWorkflow, StoreError};
use crate::layouts::ProviderLayout;

/// Longest accepted upload file name.
const MAX_FILE_NAME_LENGTH: usize = 255;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartIngestionCommand {
    pub provider: String,
    pub file_name: String,
    #[serde(skip)]
    pub content: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartIngestionResponse {
    pub job_id: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum StartIngestionError {
    #[error("File name is required and cannot be empty")]
    FileNameRequired,
    #[error("File name must not exceed {MAX_FILE_NAME_LENGTH} characters")]
    FileNameLength,
    #[error("Uploaded file is empty")]
    ContentRequired,
    #[error("Failed to create ingestion job: {0}")]
    JobCreation(#[from] StoreError),
}

impl StartIngestionCommand {
    pub fn validate(&self) -> Result<(), StartIngestionError> {
        if self.file_name.trim().is_empty() {
            return Err(StartIngestionError::FileNameRequired);
        }
        if self.file_name.len() > MAX_FILE_NAME_LENGTH {
            return Err(StartIngestionError::FileNameLength);
        }
        if self.content.is_empty() {
            return Err(StartIngestionError::ContentRequired);
        }
        Ok(())
    }
}

#[tracing::instrument(skip(workflow, command), fields(provider = %command.provider, file_name = %command.file_name))]
pub async fn handle(
    workflow: &IngestionWorkflow,
    layout: ProviderLayout,
    command: StartIngestionCommand,
) -> Result<StartIngestionResponse, StartIngestionError> {
    command.validate()?;

    let job_id = workflow
        .start(layout, command.file_name, command.content)
        .await?;

    Ok(StartIngestionResponse { job_id })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command() -> StartIngestionCommand {
        StartIngestionCommand {
            provider: "acme".to_string(),
            file_name: "feed.csv".to_string(),
            content: b"uuid,vin\nu1,v1\n".to_vec(),
        }
    }

    #[test]
    fn test_validation_success() {
        assert!(command().validate().is_ok());
    }

    #[test]
    fn test_validation_empty_file_name() {
        let mut cmd = command();
        cmd.file_name = "   ".to_string();
        assert!(matches!(
            cmd.validate(),
            Err(StartIngestionError::FileNameRequired)
        ));
    }

    #[test]
    fn test_validation_file_name_too_long() {
        let mut cmd = command();
        cmd.file_name = "a".repeat(256);
        assert!(matches!(
            cmd.validate(),
            Err(StartIngestionError::FileNameLength)
        ));
    }

    #[test]
    fn test_validation_empty_content() {
        let mut cmd = command();
        cmd.content = vec![];
        assert!(matches!(
            cmd.validate(),
            Err(StartIngestionError::ContentRequired)
        ));
    }
}
