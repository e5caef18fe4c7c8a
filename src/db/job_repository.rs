use sqlx::{Pool, Postgres, QueryBuilder};
use tracing::debug;

use crate::db::models::{JobAnalysisRecord, ManualStatus};
use crate::query::sql;
use crate::query::{Predicate, QueryPlan};

/// Repository for job analysis database operations.
pub struct JobRepository;

impl JobRepository {
    /// Fetch one page of records for a compiled query plan.
    pub async fn search(
        pool: &Pool<Postgres>,
        plan: &QueryPlan,
    ) -> Result<Vec<JobAnalysisRecord>, sqlx::Error> {
        debug!(
            "Searching jobs: offset={}, limit={}, sort={}",
            plan.offset,
            plan.limit,
            plan.order.field.column()
        );

        let mut builder = sql::select_jobs(plan);
        builder.build_query_as().fetch_all(pool).await
    }

    /// Fetch a single record by primary key.
    pub async fn find_by_id(
        pool: &Pool<Postgres>,
        id: &str,
    ) -> Result<Option<JobAnalysisRecord>, sqlx::Error> {
        debug!("Fetching job: id={}", id);

        let mut builder = sql::select_job_by_id(id);
        builder.build_query_as().fetch_optional(pool).await
    }

    /// Count all records matching the predicate, ignoring pagination.
    pub async fn count(pool: &Pool<Postgres>, predicate: &Predicate) -> Result<i64, sqlx::Error> {
        let mut builder = sql::count_jobs(predicate);
        builder.build_query_scalar().fetch_one(pool).await
    }

    /// Set the manual status of one record, stamping the decision time.
    /// Returns the number of rows touched (0 when the id is unknown).
    pub async fn set_status(
        pool: &Pool<Postgres>,
        id: &str,
        status: ManualStatus,
    ) -> Result<u64, sqlx::Error> {
        debug!("Updating status: id={}, status={}", id, status.as_str());

        let result = sqlx::query(
            "UPDATE job_analyses \
             SET manual_status = $1, manual_decision_at = now(), updated_at = now() \
             WHERE id = $2",
        )
        .bind(status.as_str())
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Patch status and/or notes on one record. Only a status change stamps
    /// the decision time; a notes-only edit leaves it untouched.
    pub async fn update_details(
        pool: &Pool<Postgres>,
        id: &str,
        status: Option<ManualStatus>,
        notes: Option<&str>,
    ) -> Result<u64, sqlx::Error> {
        debug!(
            "Updating details: id={}, status={:?}, has_notes={}",
            id,
            status.map(ManualStatus::as_str),
            notes.is_some()
        );

        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("UPDATE job_analyses SET updated_at = now()");
        if let Some(status) = status {
            builder.push(", manual_status = ");
            builder.push_bind(status.as_str());
            builder.push(", manual_decision_at = now()");
        }
        if let Some(notes) = notes {
            builder.push(", manual_notes = ");
            builder.push_bind(notes.to_owned());
        }
        builder.push(" WHERE id = ");
        builder.push_bind(id.to_owned());

        let result = builder.build().execute(pool).await?;
        Ok(result.rows_affected())
    }

    /// Set status (and optionally notes) on many records at once. Last write
    /// wins; every value is absolute, so replays are harmless.
    pub async fn set_status_many(
        pool: &Pool<Postgres>,
        ids: &[String],
        status: ManualStatus,
        notes: Option<&str>,
    ) -> Result<u64, sqlx::Error> {
        if ids.is_empty() {
            debug!("Bulk status update called with empty id list");
            return Ok(0);
        }

        debug!(
            "Bulk updating {} jobs to status={}",
            ids.len(),
            status.as_str()
        );

        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("UPDATE job_analyses SET manual_status = ");
        builder.push_bind(status.as_str());
        builder.push(", manual_decision_at = now(), updated_at = now()");
        if let Some(notes) = notes {
            builder.push(", manual_notes = ");
            builder.push_bind(notes.to_owned());
        }
        builder.push(" WHERE id = ANY(");
        builder.push_bind(ids.to_vec());
        builder.push(")");

        let result = builder.build().execute(pool).await?;
        let rows_affected = result.rows_affected();
        debug!("Bulk status update touched {} rows", rows_affected);

        Ok(rows_affected)
    }
}
