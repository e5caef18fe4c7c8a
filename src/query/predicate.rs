//! Tagged-variant predicate tree.
//!
//! Every filter dimension compiles to its own [`Predicate`] and the trees are
//! combined by structural composition only. OR lists are created exclusively
//! inside a single dimension's builder, so two multi-value dimensions can
//! never bleed into one shared OR — the merge step is a plain conjunction.

use chrono::NaiveDateTime;
use serde_json::Value;

use crate::db::models::JobAnalysisRecord;

/// A directly-filterable column of `job_analyses`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    JobTitle,
    CompanyName,
    ManualStatus,
    OverallCompatibility,
    IsApplied,
    HasEasyApply,
    CreatedAt,
}

impl Field {
    pub const fn column(self) -> &'static str {
        match self {
            Self::JobTitle => "job_title",
            Self::CompanyName => "company_name",
            Self::ManualStatus => "manual_status",
            Self::OverallCompatibility => "overall_compatibility",
            Self::IsApplied => "is_applied",
            Self::HasEasyApply => "has_easy_apply",
            Self::CreatedAt => "created_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Gte,
    Lte,
    /// Case-insensitive substring match.
    ContainsInsensitive,
}

/// A comparison operand. Carries the typed value so the SQL renderer can bind
/// it with the right wire type.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Str(String),
    Int(i64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

/// A composable query predicate.
///
/// `True` is the identity element: a dimension whose input is absent builds
/// `True`, and [`Predicate::all`] drops it during merging.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    True,
    Cmp {
        field: Field,
        op: CmpOp,
        value: Scalar,
    },
    /// Comparison against a value nested inside the `analysis_data` JSONB
    /// column. The path is always a static identifier list, never user input.
    JsonCmp {
        path: &'static [&'static str],
        op: CmpOp,
        value: Scalar,
    },
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
}

impl Predicate {
    pub fn cmp(field: Field, op: CmpOp, value: Scalar) -> Self {
        Self::Cmp { field, op, value }
    }

    pub fn json_cmp(path: &'static [&'static str], op: CmpOp, value: Scalar) -> Self {
        Self::JsonCmp { path, op, value }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::True)
    }

    /// Disjunction of the given parts. A single part stays a plain condition
    /// (no OR wrapper); an empty list is no constraint.
    pub fn any(mut parts: Vec<Predicate>) -> Self {
        parts.retain(|p| !p.is_empty());
        match parts.len() {
            0 => Self::True,
            1 => parts.remove(0),
            _ => Self::Or(parts),
        }
    }

    /// Conjunction of the given parts. Drops `True`, flattens directly nested
    /// ANDs, and leaves each dimension's OR group intact as one nested clause.
    pub fn all(parts: Vec<Predicate>) -> Self {
        let mut flat = Vec::with_capacity(parts.len());
        for part in parts {
            match part {
                Self::True => {}
                Self::And(nested) => flat.extend(nested),
                other => flat.push(other),
            }
        }
        match flat.len() {
            0 => Self::True,
            1 => flat.remove(0),
            _ => Self::And(flat),
        }
    }

    /// Evaluate this predicate against an in-memory record.
    ///
    /// Mirrors the SQL renderer's semantics and backs the semantic tests for
    /// the compiler; comparisons against a missing JSON path are false.
    pub fn matches(&self, record: &JobAnalysisRecord) -> bool {
        match self {
            Self::True => true,
            Self::And(parts) => parts.iter().all(|p| p.matches(record)),
            Self::Or(parts) => parts.iter().any(|p| p.matches(record)),
            Self::Cmp { field, op, value } => matches_field(record, *field, *op, value),
            Self::JsonCmp { path, op, value } => {
                matches_json(record.analysis_data.as_ref(), path, *op, value)
            }
        }
    }
}

fn matches_field(record: &JobAnalysisRecord, field: Field, op: CmpOp, value: &Scalar) -> bool {
    match (field, op, value) {
        (Field::JobTitle, CmpOp::ContainsInsensitive, Scalar::Str(term)) => {
            contains_insensitive(&record.job_title, term)
        }
        (Field::CompanyName, CmpOp::ContainsInsensitive, Scalar::Str(term)) => {
            contains_insensitive(&record.company_name, term)
        }
        (Field::ManualStatus, CmpOp::Eq, Scalar::Str(status)) => record.manual_status == *status,
        (Field::OverallCompatibility, op, Scalar::Int(bound)) => {
            compare_i64(i64::from(record.overall_compatibility), op, *bound)
        }
        (Field::IsApplied, CmpOp::Eq, Scalar::Bool(flag)) => record.is_applied == *flag,
        (Field::HasEasyApply, CmpOp::Eq, Scalar::Bool(flag)) => record.has_easy_apply == *flag,
        (Field::CreatedAt, CmpOp::Gte, Scalar::DateTime(bound)) => record.created_at >= *bound,
        (Field::CreatedAt, CmpOp::Lte, Scalar::DateTime(bound)) => record.created_at <= *bound,
        _ => false,
    }
}

fn matches_json(document: Option<&Value>, path: &[&str], op: CmpOp, value: &Scalar) -> bool {
    let Some(mut current) = document else {
        return false;
    };
    for segment in path {
        match current.get(segment) {
            Some(next) => current = next,
            None => return false,
        }
    }
    match (op, value) {
        (CmpOp::Eq, Scalar::Str(expected)) => current.as_str() == Some(expected.as_str()),
        (CmpOp::Gte, Scalar::Int(bound)) => {
            current.as_f64().is_some_and(|v| v >= *bound as f64)
        }
        (CmpOp::Lte, Scalar::Int(bound)) => {
            current.as_f64().is_some_and(|v| v <= *bound as f64)
        }
        _ => false,
    }
}

fn compare_i64(lhs: i64, op: CmpOp, rhs: i64) -> bool {
    match op {
        CmpOp::Eq => lhs == rhs,
        CmpOp::Gte => lhs >= rhs,
        CmpOp::Lte => lhs <= rhs,
        CmpOp::ContainsInsensitive => false,
    }
}

fn contains_insensitive(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn record() -> JobAnalysisRecord {
        JobAnalysisRecord {
            id: "job-1".into(),
            job_id: "4040404040".into(),
            job_url: "https://example.com/jobs/4040404040".into(),
            job_title: "Senior Rust Engineer".into(),
            company_name: "Acme Corp".into(),
            job_description: "Build backend services".into(),
            is_applied: false,
            has_easy_apply: true,
            overall_compatibility: 72,
            manual_status: "PENDING".into(),
            manual_decision_at: None,
            manual_notes: None,
            recruiter_url: None,
            analysis_data: Some(json!({
                "experienceRequirements": {
                    "minimumYears": 5,
                    "seniorityLevel": "Senior"
                },
                "summary": { "recommendation": "advance" }
            })),
            created_at: NaiveDate::from_ymd_opt(2024, 1, 15)
                .unwrap()
                .and_hms_opt(23, 59, 0)
                .unwrap(),
            updated_at: NaiveDate::from_ymd_opt(2024, 1, 16)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
        }
    }

    fn status_eq(status: &str) -> Predicate {
        Predicate::cmp(Field::ManualStatus, CmpOp::Eq, Scalar::Str(status.into()))
    }

    #[test]
    fn all_drops_identity_and_flattens_nested_ands() {
        let merged = Predicate::all(vec![
            Predicate::True,
            Predicate::And(vec![status_eq("PENDING"), status_eq("APPLIED")]),
            Predicate::True,
        ]);
        assert_eq!(
            merged,
            Predicate::And(vec![status_eq("PENDING"), status_eq("APPLIED")])
        );
    }

    #[test]
    fn all_of_nothing_is_no_constraint() {
        assert_eq!(Predicate::all(vec![]), Predicate::True);
        assert_eq!(Predicate::all(vec![Predicate::True]), Predicate::True);
    }

    #[test]
    fn all_unwraps_a_single_condition() {
        assert_eq!(
            Predicate::all(vec![Predicate::True, status_eq("PENDING")]),
            status_eq("PENDING")
        );
    }

    #[test]
    fn any_keeps_single_value_as_plain_equality() {
        assert_eq!(Predicate::any(vec![status_eq("PENDING")]), status_eq("PENDING"));
    }

    #[test]
    fn any_of_multiple_values_is_an_or_group() {
        let or = Predicate::any(vec![status_eq("PENDING"), status_eq("INTERESTED")]);
        assert_eq!(
            or,
            Predicate::Or(vec![status_eq("PENDING"), status_eq("INTERESTED")])
        );
    }

    #[test]
    fn or_groups_from_different_dimensions_stay_independent() {
        // Record is PENDING + Senior. First OR group matches, second does not:
        // the conjunction must reject the record.
        let status_group = Predicate::any(vec![status_eq("PENDING"), status_eq("APPLIED")]);
        let seniority_group = Predicate::any(vec![
            Predicate::json_cmp(
                &["experienceRequirements", "seniorityLevel"],
                CmpOp::Eq,
                Scalar::Str("Entry".into()),
            ),
            Predicate::json_cmp(
                &["experienceRequirements", "seniorityLevel"],
                CmpOp::Eq,
                Scalar::Str("Junior".into()),
            ),
        ]);
        let combined = Predicate::all(vec![status_group.clone(), seniority_group]);

        assert!(status_group.matches(&record()));
        assert!(!combined.matches(&record()));
    }

    #[test]
    fn substring_match_is_case_insensitive() {
        let title = Predicate::cmp(
            Field::JobTitle,
            CmpOp::ContainsInsensitive,
            Scalar::Str("rust".into()),
        );
        assert!(title.matches(&record()));

        let company = Predicate::cmp(
            Field::CompanyName,
            CmpOp::ContainsInsensitive,
            Scalar::Str("ACME".into()),
        );
        assert!(company.matches(&record()));
    }

    #[test]
    fn json_range_bounds_are_conjoined() {
        let years_between = |min: i64, max: i64| {
            Predicate::all(vec![
                Predicate::json_cmp(
                    &["experienceRequirements", "minimumYears"],
                    CmpOp::Gte,
                    Scalar::Int(min),
                ),
                Predicate::json_cmp(
                    &["experienceRequirements", "minimumYears"],
                    CmpOp::Lte,
                    Scalar::Int(max),
                ),
            ])
        };

        // minimumYears = 5 in the sample record
        assert!(years_between(3, 10).matches(&record()));
        assert!(!years_between(6, 10).matches(&record()));
        assert!(!years_between(0, 4).matches(&record()));
    }

    #[test]
    fn json_comparison_against_missing_document_is_false() {
        let mut no_doc = record();
        no_doc.analysis_data = None;
        let seniority = Predicate::json_cmp(
            &["experienceRequirements", "seniorityLevel"],
            CmpOp::Eq,
            Scalar::Str("Senior".into()),
        );
        assert!(!seniority.matches(&no_doc));

        let mut wrong_shape = record();
        wrong_shape.analysis_data = Some(json!("not an object"));
        assert!(!seniority.matches(&wrong_shape));
    }

    #[test]
    fn date_bounds_compare_against_created_at() {
        let upper = Predicate::cmp(
            Field::CreatedAt,
            CmpOp::Lte,
            Scalar::DateTime(
                NaiveDate::from_ymd_opt(2024, 1, 15)
                    .unwrap()
                    .and_hms_milli_opt(23, 59, 59, 999)
                    .unwrap(),
            ),
        );
        // Created 2024-01-15T23:59:00, inside the inclusive end day.
        assert!(upper.matches(&record()));

        let lower = Predicate::cmp(
            Field::CreatedAt,
            CmpOp::Gte,
            Scalar::DateTime(
                NaiveDate::from_ymd_opt(2024, 1, 16)
                    .unwrap()
                    .and_hms_opt(0, 0, 1)
                    .unwrap(),
            ),
        );
        assert!(!lower.matches(&record()));
    }
}
