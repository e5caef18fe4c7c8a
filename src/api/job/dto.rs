use chrono::NaiveDateTime;
use serde::Serialize;

use crate::api::job::analysis::AnalysisDocument;
use crate::db::models::JobAnalysisRecord;

/// Flat row shape consumed by the dashboard table.
///
/// Scalar columns are copied verbatim; the three derived fields come from the
/// JSONB analysis document and are absent whenever the document is missing or
/// malformed.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRow {
    pub id: String,
    pub job_id: String,
    pub job_url: String,
    pub job_title: String,
    pub company_name: String,
    pub job_description: String,
    pub is_applied: bool,
    pub has_easy_apply: bool,
    pub overall_compatibility: i32,
    pub manual_status: String,
    pub manual_decision_at: Option<NaiveDateTime>,
    pub manual_notes: Option<String>,
    pub recruiter_url: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience_required: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seniority_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ia_recommendation: Option<String>,
}

impl JobRow {
    pub fn from_record(record: JobAnalysisRecord) -> Self {
        let document = AnalysisDocument::from_value(record.analysis_data.as_ref());
        let experience = document
            .as_ref()
            .and_then(|doc| doc.experience_requirements.as_ref());

        Self {
            experience_required: experience
                .and_then(|e| e.minimum_years)
                .filter(|years| *years > 0.0)
                .map(|years| format!("{years}+ years")),
            seniority_level: experience.and_then(|e| e.seniority_level.clone()),
            ia_recommendation: document
                .as_ref()
                .and_then(|doc| doc.summary.as_ref())
                .and_then(|summary| summary.recommendation.clone()),
            id: record.id,
            job_id: record.job_id,
            job_url: record.job_url,
            job_title: record.job_title,
            company_name: record.company_name,
            job_description: record.job_description,
            is_applied: record.is_applied,
            has_easy_apply: record.has_easy_apply,
            overall_compatibility: record.overall_compatibility,
            manual_status: record.manual_status,
            manual_decision_at: record.manual_decision_at,
            manual_notes: record.manual_notes,
            recruiter_url: record.recruiter_url,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Response for the single-job detail endpoint: the flat row projection plus
/// the full validated analysis document. `analysis` is null whenever the
/// stored document is missing or malformed, while the scalar columns render
/// regardless.
#[derive(Debug, Serialize)]
pub struct JobDetailResponse {
    #[serde(flatten)]
    pub job: JobRow,
    pub analysis: Option<AnalysisDocument>,
}

impl JobDetailResponse {
    pub fn from_record(record: JobAnalysisRecord) -> Self {
        let analysis = AnalysisDocument::from_value(record.analysis_data.as_ref());
        Self {
            job: JobRow::from_record(record),
            analysis,
        }
    }
}

/// Response for the paginated listing endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobListResponse {
    pub jobs: Vec<JobRow>,
    pub total_count: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

/// Response for single-record mutations.
#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    pub message: String,
}

/// Response for bulk status updates.
#[derive(Debug, Serialize)]
pub struct BulkUpdateResponse {
    pub message: String,
    pub updated: u64,
}
