//! Per-dimension predicate builders.
//!
//! Each builder is a pure function from one filter dimension to a
//! [`Predicate`]; an absent dimension builds `Predicate::True`. Builders never
//! look at each other's input, which is what keeps the merge step a plain
//! conjunction.

use chrono::NaiveDateTime;

use crate::db::models::{ManualStatus, Recommendation, SeniorityLevel};
use crate::query::predicate::{CmpOp, Field, Predicate, Scalar};

/// JSON path of the inferred seniority inside `analysis_data`.
pub const SENIORITY_PATH: &[&str] = &["experienceRequirements", "seniorityLevel"];
/// JSON path of the AI recommendation inside `analysis_data`.
pub const RECOMMENDATION_PATH: &[&str] = &["summary", "recommendation"];
/// JSON path of the minimum required experience inside `analysis_data`.
pub const MINIMUM_YEARS_PATH: &[&str] = &["experienceRequirements", "minimumYears"];

/// Case-insensitive substring match over title and company.
pub fn search(term: Option<&str>) -> Predicate {
    match term {
        Some(term) => Predicate::any(vec![
            Predicate::cmp(
                Field::JobTitle,
                CmpOp::ContainsInsensitive,
                Scalar::Str(term.to_owned()),
            ),
            Predicate::cmp(
                Field::CompanyName,
                CmpOp::ContainsInsensitive,
                Scalar::Str(term.to_owned()),
            ),
        ]),
        None => Predicate::True,
    }
}

pub fn status_set(statuses: &[ManualStatus]) -> Predicate {
    Predicate::any(
        statuses
            .iter()
            .map(|status| {
                Predicate::cmp(
                    Field::ManualStatus,
                    CmpOp::Eq,
                    Scalar::Str(status.as_str().to_owned()),
                )
            })
            .collect(),
    )
}

pub fn seniority_set(levels: &[SeniorityLevel]) -> Predicate {
    json_equality_set(SENIORITY_PATH, levels.iter().map(|l| l.as_str()))
}

pub fn recommendation_set(recommendations: &[Recommendation]) -> Predicate {
    json_equality_set(RECOMMENDATION_PATH, recommendations.iter().map(|r| r.as_str()))
}

pub fn compatibility_range(min: Option<i64>, max: Option<i64>) -> Predicate {
    Predicate::all(
        [
            min.map(|m| Predicate::cmp(Field::OverallCompatibility, CmpOp::Gte, Scalar::Int(m))),
            max.map(|m| Predicate::cmp(Field::OverallCompatibility, CmpOp::Lte, Scalar::Int(m))),
        ]
        .into_iter()
        .flatten()
        .collect(),
    )
}

/// Both bounds target the same JSON path and are conjoined as one unit; they
/// must never end up as independent clauses an unrelated OR could absorb.
pub fn experience_range(min: Option<i64>, max: Option<i64>) -> Predicate {
    Predicate::all(
        [
            min.map(|m| Predicate::json_cmp(MINIMUM_YEARS_PATH, CmpOp::Gte, Scalar::Int(m))),
            max.map(|m| Predicate::json_cmp(MINIMUM_YEARS_PATH, CmpOp::Lte, Scalar::Int(m))),
        ]
        .into_iter()
        .flatten()
        .collect(),
    )
}

pub fn created_range(from: Option<NaiveDateTime>, to: Option<NaiveDateTime>) -> Predicate {
    Predicate::all(
        [
            from.map(|f| Predicate::cmp(Field::CreatedAt, CmpOp::Gte, Scalar::DateTime(f))),
            to.map(|t| Predicate::cmp(Field::CreatedAt, CmpOp::Lte, Scalar::DateTime(t))),
        ]
        .into_iter()
        .flatten()
        .collect(),
    )
}

pub fn flags(is_applied: Option<bool>, has_easy_apply: Option<bool>) -> Predicate {
    Predicate::all(
        [
            is_applied.map(|b| Predicate::cmp(Field::IsApplied, CmpOp::Eq, Scalar::Bool(b))),
            has_easy_apply.map(|b| Predicate::cmp(Field::HasEasyApply, CmpOp::Eq, Scalar::Bool(b))),
        ]
        .into_iter()
        .flatten()
        .collect(),
    )
}

fn json_equality_set<'a>(
    path: &'static [&'static str],
    values: impl Iterator<Item = &'a str>,
) -> Predicate {
    Predicate::any(
        values
            .map(|value| Predicate::json_cmp(path, CmpOp::Eq, Scalar::Str(value.to_owned())))
            .collect(),
    )
}
