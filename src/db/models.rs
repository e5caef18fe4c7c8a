use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Database representation of an analyzed job posting.
///
/// `analysis_data` is the raw JSONB document produced by the AI analysis
/// pipeline. It is stored as-is and only parsed on the read path; a malformed
/// document never fails a query.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct JobAnalysisRecord {
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
    pub analysis_data: Option<serde_json::Value>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Workflow state a user assigns to a job posting.
///
/// Stored in the database and sent over the wire as SCREAMING_SNAKE_CASE
/// strings. New records start as `Pending`.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ManualStatus {
    Pending,
    Ignored,
    Interested,
    Applied,
    Rejected,
    Interview,
    Offer,
    Accepted,
    Declined,
}

impl ManualStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Ignored => "IGNORED",
            Self::Interested => "INTERESTED",
            Self::Applied => "APPLIED",
            Self::Rejected => "REJECTED",
            Self::Interview => "INTERVIEW",
            Self::Offer => "OFFER",
            Self::Accepted => "ACCEPTED",
            Self::Declined => "DECLINED",
        }
    }

    /// Parse a wire value. Unknown values return `None` so filters can
    /// silently discard them instead of failing the request.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "PENDING" => Some(Self::Pending),
            "IGNORED" => Some(Self::Ignored),
            "INTERESTED" => Some(Self::Interested),
            "APPLIED" => Some(Self::Applied),
            "REJECTED" => Some(Self::Rejected),
            "INTERVIEW" => Some(Self::Interview),
            "OFFER" => Some(Self::Offer),
            "ACCEPTED" => Some(Self::Accepted),
            "DECLINED" => Some(Self::Declined),
            _ => None,
        }
    }
}

/// Seniority inferred by the analysis pipeline, stored capitalized inside the
/// JSON document at `experienceRequirements.seniorityLevel`.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum SeniorityLevel {
    Entry,
    Junior,
    Mid,
    Senior,
    Lead,
    Principal,
    Unknown,
}

impl SeniorityLevel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Entry => "Entry",
            Self::Junior => "Junior",
            Self::Mid => "Mid",
            Self::Senior => "Senior",
            Self::Lead => "Lead",
            Self::Principal => "Principal",
            Self::Unknown => "Unknown",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Entry" => Some(Self::Entry),
            "Junior" => Some(Self::Junior),
            "Mid" => Some(Self::Mid),
            "Senior" => Some(Self::Senior),
            "Lead" => Some(Self::Lead),
            "Principal" => Some(Self::Principal),
            "Unknown" => Some(Self::Unknown),
            _ => None,
        }
    }
}

/// AI verdict, stored snake_case inside the JSON document at
/// `summary.recommendation`.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Advance,
    Reject,
    EvaluateWithReservations,
}

impl Recommendation {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Advance => "advance",
            Self::Reject => "reject",
            Self::EvaluateWithReservations => "evaluate_with_reservations",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "advance" => Some(Self::Advance),
            "reject" => Some(Self::Reject),
            "evaluate_with_reservations" => Some(Self::EvaluateWithReservations),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_status_round_trips_through_parse() {
        for status in [
            ManualStatus::Pending,
            ManualStatus::Ignored,
            ManualStatus::Interested,
            ManualStatus::Applied,
            ManualStatus::Rejected,
            ManualStatus::Interview,
            ManualStatus::Offer,
            ManualStatus::Accepted,
            ManualStatus::Declined,
        ] {
            assert_eq!(ManualStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn parse_is_case_exact() {
        assert_eq!(ManualStatus::parse("pending"), None);
        assert_eq!(SeniorityLevel::parse("senior"), None);
        assert_eq!(Recommendation::parse("ADVANCE"), None);
    }

    #[test]
    fn unknown_values_are_rejected() {
        assert_eq!(ManualStatus::parse("FOO"), None);
        assert_eq!(SeniorityLevel::parse(""), None);
        assert_eq!(Recommendation::parse("maybe"), None);
    }
}
