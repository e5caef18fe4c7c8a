use serde::Deserialize;
use validator::Validate;

use crate::db::models::ManualStatus;

/// Notes are bounded after sanitization; anything longer is rejected before a
/// write is attempted.
pub const MAX_NOTES_CHARS: u64 = 2000;

/// Body of `PATCH /jobs/{id}/status`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateStatusPayload {
    pub status: ManualStatus,
}

/// Body of `PATCH /jobs/{id}`. Both fields optional; a status change stamps
/// the decision time, a notes-only edit does not.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDetailsPayload {
    pub manual_status: Option<ManualStatus>,
    #[validate(length(max = 2000, message = "Notes must not exceed 2000 characters"))]
    pub manual_notes: Option<String>,
}

/// Body of `POST /jobs/bulk-status`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BulkStatusPayload {
    #[validate(length(min = 1, message = "At least one job id is required"))]
    pub job_ids: Vec<String>,
    pub status: ManualStatus,
    #[validate(length(max = 2000, message = "Notes must not exceed 2000 characters"))]
    pub notes: Option<String>,
}
