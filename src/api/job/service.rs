use actix_web::{HttpResponse, ResponseError};
use sqlx::{Pool, Postgres};
use std::fmt;
use tracing::{error, info, warn};

use crate::api::job::dto::{
    BulkUpdateResponse, JobDetailResponse, JobListResponse, JobRow, UpdateResponse,
};
use crate::api::job::models::{BulkStatusPayload, UpdateDetailsPayload, MAX_NOTES_CHARS};
use crate::api::validation::ErrorResponse;
use crate::db::job_repository::JobRepository;
use crate::db::models::ManualStatus;
use crate::query::{self, FilterCriteria};

/// Service-level errors
#[derive(Debug)]
pub enum ServiceError {
    /// Database operation failed
    DatabaseError(sqlx::Error),

    /// Validation failed before any write was attempted
    ValidationError(String),

    /// Job not found
    NotFound(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::DatabaseError(e) => write!(f, "Database error: {}", e),
            ServiceError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ServiceError::NotFound(id) => write!(f, "Job not found: {}", id),
        }
    }
}

impl std::error::Error for ServiceError {}

impl ResponseError for ServiceError {
    fn error_response(&self) -> HttpResponse {
        match self {
            ServiceError::DatabaseError(e) => {
                error!("Database error: {}", e);
                HttpResponse::InternalServerError().json(ErrorResponse {
                    error: "Failed to process request".to_string(),
                    fields: serde_json::json!({"message": "Database error occurred"}),
                })
            }
            ServiceError::ValidationError(msg) => {
                warn!("Validation error: {}", msg);
                HttpResponse::BadRequest().json(ErrorResponse {
                    error: "Validation failed".to_string(),
                    fields: serde_json::json!({"message": msg}),
                })
            }
            ServiceError::NotFound(id) => {
                warn!("Job not found: {}", id);
                HttpResponse::NotFound().json(ErrorResponse {
                    error: "Not found".to_string(),
                    fields: serde_json::json!({"message": format!("Job with id {} not found", id)}),
                })
            }
        }
    }
}

/// Job dashboard business logic: listing with compiled filters, and the
/// status/notes decision operations.
pub struct JobService {
    pool: Pool<Postgres>,
}

impl JobService {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List jobs matching the given criteria.
    ///
    /// Compiles the criteria once, then fetches the page and the total count
    /// concurrently; neither read depends on the other.
    pub async fn list_jobs(&self, criteria: &FilterCriteria) -> Result<JobListResponse, ServiceError> {
        let plan = query::compile(criteria);

        let (records, total_count) = tokio::try_join!(
            JobRepository::search(&self.pool, &plan),
            JobRepository::count(&self.pool, &plan.predicate),
        )
        .map_err(ServiceError::DatabaseError)?;

        info!(
            "Service: Listed {} of {} jobs (page={}, limit={})",
            records.len(),
            total_count,
            criteria.page,
            criteria.limit
        );

        let jobs: Vec<JobRow> = records.into_iter().map(JobRow::from_record).collect();
        let total_pages = (total_count + criteria.limit - 1) / criteria.limit;

        Ok(JobListResponse {
            jobs,
            total_count,
            page: criteria.page,
            limit: criteria.limit,
            total_pages,
        })
    }

    /// Fetch a single job with its full analysis document.
    pub async fn get_job(&self, id: &str) -> Result<JobDetailResponse, ServiceError> {
        let record = JobRepository::find_by_id(&self.pool, id)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))?;

        info!("Service: Fetched job {}", id);
        Ok(JobDetailResponse::from_record(record))
    }

    /// Set the manual status of a single job.
    pub async fn set_status(
        &self,
        id: &str,
        status: ManualStatus,
    ) -> Result<UpdateResponse, ServiceError> {
        let affected = JobRepository::set_status(&self.pool, id, status)
            .await
            .map_err(ServiceError::DatabaseError)?;

        if affected == 0 {
            return Err(ServiceError::NotFound(id.to_string()));
        }

        info!("Service: Job {} set to {}", id, status.as_str());
        Ok(UpdateResponse {
            message: "Job status updated successfully".to_string(),
        })
    }

    /// Patch status and/or notes of a single job.
    pub async fn update_details(
        &self,
        id: &str,
        payload: &UpdateDetailsPayload,
    ) -> Result<UpdateResponse, ServiceError> {
        if payload.manual_status.is_none() && payload.manual_notes.is_none() {
            return Err(ServiceError::ValidationError(
                "No fields to update".to_string(),
            ));
        }
        validate_notes(payload.manual_notes.as_deref())?;

        let affected = JobRepository::update_details(
            &self.pool,
            id,
            payload.manual_status,
            payload.manual_notes.as_deref(),
        )
        .await
        .map_err(ServiceError::DatabaseError)?;

        if affected == 0 {
            return Err(ServiceError::NotFound(id.to_string()));
        }

        info!("Service: Job {} details updated", id);
        Ok(UpdateResponse {
            message: "Job details updated successfully".to_string(),
        })
    }

    /// Set status and notes on many jobs at once. Last write wins.
    pub async fn bulk_set_status(
        &self,
        payload: &BulkStatusPayload,
    ) -> Result<BulkUpdateResponse, ServiceError> {
        if payload.job_ids.is_empty() {
            return Err(ServiceError::ValidationError(
                "At least one job id is required".to_string(),
            ));
        }
        validate_notes(payload.notes.as_deref())?;

        let updated = JobRepository::set_status_many(
            &self.pool,
            &payload.job_ids,
            payload.status,
            payload.notes.as_deref(),
        )
        .await
        .map_err(ServiceError::DatabaseError)?;

        info!(
            "Service: Bulk update set {} of {} jobs to {}",
            updated,
            payload.job_ids.len(),
            payload.status.as_str()
        );

        Ok(BulkUpdateResponse {
            message: format!("Updated {} jobs", updated),
            updated,
        })
    }
}

/// Reject over-long notes before touching the database. Counts characters,
/// not bytes, to match the limit users see in the UI.
fn validate_notes(notes: Option<&str>) -> Result<(), ServiceError> {
    if let Some(notes) = notes {
        if notes.chars().count() as u64 > MAX_NOTES_CHARS {
            return Err(ServiceError::ValidationError(format!(
                "Notes must not exceed {} characters",
                MAX_NOTES_CHARS
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notes_at_the_limit_pass() {
        let notes = "a".repeat(2000);
        assert!(validate_notes(Some(&notes)).is_ok());
        assert!(validate_notes(None).is_ok());
    }

    #[test]
    fn notes_over_the_limit_fail_as_validation_not_storage() {
        let notes = "a".repeat(2001);
        let err = validate_notes(Some(&notes)).unwrap_err();
        assert!(matches!(err, ServiceError::ValidationError(_)));
    }

    #[test]
    fn multibyte_notes_are_counted_in_characters() {
        // 2000 three-byte characters: within the limit despite 6000 bytes.
        let notes = "é".repeat(2000);
        assert!(validate_notes(Some(&notes)).is_ok());
    }
}
