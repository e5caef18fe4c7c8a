//! Query-string normalization.
//!
//! Turns the flat `key=value` map of a dashboard request into a typed
//! [`FilterCriteria`]. Normalization never fails: malformed input degrades to
//! "dimension not applied" or a dimension default, so a bad query string can
//! at worst widen the result set, never error the request.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};

use crate::db::models::{ManualStatus, Recommendation, SeniorityLevel};
use crate::query::plan::{SortField, SortOrder};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 20;
pub const MAX_LIMIT: i64 = 100;
pub const DEFAULT_MIN_COMPATIBILITY: i64 = 0;
pub const DEFAULT_MAX_COMPATIBILITY: i64 = 100;
pub const DEFAULT_MIN_EXPERIENCE: i64 = 0;
pub const DEFAULT_MAX_EXPERIENCE: i64 = 20;

/// Typed filter/sort/pagination parameters for one dashboard request.
///
/// Range bounds are `None` when the parameter was absent and fall back to the
/// dimension default when present but malformed, mirroring how the dashboard
/// always submits both ends of a slider together.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    pub search: Option<String>,
    pub manual_statuses: Vec<ManualStatus>,
    pub seniority_levels: Vec<SeniorityLevel>,
    pub ia_recommendations: Vec<Recommendation>,
    pub min_compatibility: Option<i64>,
    pub max_compatibility: Option<i64>,
    pub min_experience: Option<i64>,
    pub max_experience: Option<i64>,
    pub date_from: Option<NaiveDateTime>,
    pub date_to: Option<NaiveDateTime>,
    pub is_applied: Option<bool>,
    pub has_easy_apply: Option<bool>,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
    pub page: i64,
    pub limit: i64,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            search: None,
            manual_statuses: Vec::new(),
            seniority_levels: Vec::new(),
            ia_recommendations: Vec::new(),
            min_compatibility: None,
            max_compatibility: None,
            min_experience: None,
            max_experience: None,
            date_from: None,
            date_to: None,
            is_applied: None,
            has_easy_apply: None,
            sort_by: SortField::CreatedAt,
            sort_order: SortOrder::Desc,
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl FilterCriteria {
    /// Normalize raw query parameters. Recognized keys: `search`,
    /// `manualStatus`, `seniority`, `iaRecommendation`, `minCompatibility`,
    /// `maxCompatibility`, `minExperience`, `maxExperience`, `dateFrom`,
    /// `dateTo`, `isApplied`, `hasEasyApply`, `sortBy`, `sortOrder`, `page`,
    /// `limit`. Unrecognized keys are ignored.
    pub fn from_query(params: &HashMap<String, String>) -> Self {
        let raw = |key: &str| {
            params
                .get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
        };

        Self {
            search: raw("search").map(str::to_owned),
            manual_statuses: parse_set(raw("manualStatus"), ManualStatus::parse),
            seniority_levels: parse_set(raw("seniority"), SeniorityLevel::parse),
            ia_recommendations: parse_set(raw("iaRecommendation"), Recommendation::parse),
            min_compatibility: parse_bound(raw("minCompatibility"), DEFAULT_MIN_COMPATIBILITY),
            max_compatibility: parse_bound(raw("maxCompatibility"), DEFAULT_MAX_COMPATIBILITY),
            min_experience: parse_bound(raw("minExperience"), DEFAULT_MIN_EXPERIENCE),
            max_experience: parse_bound(raw("maxExperience"), DEFAULT_MAX_EXPERIENCE),
            date_from: parse_day(raw("dateFrom")).and_then(|d| d.and_hms_opt(0, 0, 0)),
            // Inclusive of the entire end day.
            date_to: parse_day(raw("dateTo")).and_then(|d| d.and_hms_milli_opt(23, 59, 59, 999)),
            is_applied: parse_flag(raw("isApplied")),
            has_easy_apply: parse_flag(raw("hasEasyApply")),
            sort_by: SortField::parse(raw("sortBy")).unwrap_or(SortField::CreatedAt),
            sort_order: SortOrder::parse(raw("sortOrder")).unwrap_or(SortOrder::Desc),
            page: parse_page(raw("page")),
            limit: parse_limit(raw("limit")),
        }
    }
}

fn parse_page(value: Option<&str>) -> i64 {
    value
        .and_then(|v| v.parse::<i64>().ok())
        .filter(|n| *n >= DEFAULT_PAGE)
        .unwrap_or(DEFAULT_PAGE)
}

fn parse_limit(value: Option<&str>) -> i64 {
    match value.and_then(|v| v.parse::<i64>().ok()) {
        Some(n) if n >= 1 => n.min(MAX_LIMIT),
        _ => DEFAULT_LIMIT,
    }
}

/// Absent means the bound is not applied; a present but unparsable value
/// falls back to the dimension default rather than dropping the bound.
fn parse_bound(value: Option<&str>, fallback: i64) -> Option<i64> {
    value.map(|v| v.parse::<i64>().unwrap_or(fallback))
}

fn parse_flag(value: Option<&str>) -> Option<bool> {
    match value {
        Some("true") => Some(true),
        Some("false") => Some(false),
        _ => None,
    }
}

fn parse_day(value: Option<&str>) -> Option<NaiveDate> {
    value.and_then(|v| NaiveDate::parse_from_str(v, "%Y-%m-%d").ok())
}

fn parse_set<T>(value: Option<&str>, parse: impl Fn(&str) -> Option<T>) -> Vec<T> {
    let Some(value) = value else {
        return Vec::new();
    };
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| parse(entry))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn empty_query_yields_defaults() {
        let criteria = FilterCriteria::from_query(&HashMap::new());
        assert_eq!(criteria, FilterCriteria::default());
        assert_eq!(criteria.page, 1);
        assert_eq!(criteria.limit, 20);
        assert_eq!(criteria.sort_by, SortField::CreatedAt);
        assert_eq!(criteria.sort_order, SortOrder::Desc);
    }

    #[test]
    fn limit_is_clamped_to_the_maximum() {
        let criteria = FilterCriteria::from_query(&query(&[("limit", "500")]));
        assert_eq!(criteria.limit, 100);
    }

    #[test]
    fn zero_or_negative_limit_falls_back_to_default() {
        for bad in ["0", "-5", "abc", ""] {
            let criteria = FilterCriteria::from_query(&query(&[("limit", bad)]));
            assert_eq!(criteria.limit, 20, "limit={bad:?}");
        }
    }

    #[test]
    fn page_zero_falls_back_to_one() {
        let criteria = FilterCriteria::from_query(&query(&[("page", "0")]));
        assert_eq!(criteria.page, 1);
        let criteria = FilterCriteria::from_query(&query(&[("page", "-3")]));
        assert_eq!(criteria.page, 1);
    }

    #[test]
    fn boolean_flags_are_tri_state() {
        let criteria = FilterCriteria::from_query(&query(&[
            ("isApplied", "true"),
            ("hasEasyApply", "banana"),
        ]));
        assert_eq!(criteria.is_applied, Some(true));
        assert_eq!(criteria.has_easy_apply, None);

        let criteria = FilterCriteria::from_query(&query(&[("isApplied", "false")]));
        assert_eq!(criteria.is_applied, Some(false));
    }

    #[test]
    fn status_set_splits_trims_and_drops_invalid_entries() {
        let criteria = FilterCriteria::from_query(&query(&[(
            "manualStatus",
            " PENDING , FOO ,, INTERESTED ",
        )]));
        assert_eq!(
            criteria.manual_statuses,
            vec![ManualStatus::Pending, ManualStatus::Interested]
        );
    }

    #[test]
    fn entirely_invalid_status_set_is_no_constraint() {
        let criteria = FilterCriteria::from_query(&query(&[("manualStatus", "FOO")]));
        assert!(criteria.manual_statuses.is_empty());
    }

    #[test]
    fn malformed_bound_falls_back_to_dimension_default() {
        let criteria = FilterCriteria::from_query(&query(&[
            ("minCompatibility", "abc"),
            ("maxExperience", "many"),
        ]));
        assert_eq!(criteria.min_compatibility, Some(0));
        assert_eq!(criteria.max_experience, Some(20));
        assert_eq!(criteria.max_compatibility, None);
        assert_eq!(criteria.min_experience, None);
    }

    #[test]
    fn date_to_covers_the_entire_end_day() {
        let criteria = FilterCriteria::from_query(&query(&[
            ("dateFrom", "2024-01-10"),
            ("dateTo", "2024-01-15"),
        ]));
        assert_eq!(
            criteria.date_from.map(|d| d.to_string()),
            Some("2024-01-10 00:00:00".to_string())
        );
        assert_eq!(
            criteria.date_to.map(|d| d.to_string()),
            Some("2024-01-15 23:59:59.999".to_string())
        );
    }

    #[test]
    fn invalid_dates_are_discarded() {
        let criteria = FilterCriteria::from_query(&query(&[
            ("dateFrom", "not-a-date"),
            ("dateTo", "2024-13-40"),
        ]));
        assert_eq!(criteria.date_from, None);
        assert_eq!(criteria.date_to, None);
    }

    #[test]
    fn search_is_trimmed_and_blank_means_absent() {
        let criteria = FilterCriteria::from_query(&query(&[("search", "  rust  ")]));
        assert_eq!(criteria.search.as_deref(), Some("rust"));

        let criteria = FilterCriteria::from_query(&query(&[("search", "   ")]));
        assert_eq!(criteria.search, None);
    }

    #[test]
    fn normalization_is_idempotent() {
        let first = FilterCriteria::from_query(&query(&[
            ("manualStatus", "PENDING,INTERESTED"),
            ("minCompatibility", "70"),
            ("page", "0"),
            ("limit", "500"),
            ("sortBy", "overallCompatibility"),
            ("sortOrder", "asc"),
        ]));

        // Re-submit the normalized values as a query string.
        let rendered = query(&[
            ("manualStatus", "PENDING,INTERESTED"),
            ("minCompatibility", "70"),
            ("page", &first.page.to_string()),
            ("limit", &first.limit.to_string()),
            ("sortBy", first.sort_by.param_name()),
            ("sortOrder", first.sort_order.param_name()),
        ]);
        let second = FilterCriteria::from_query(&rendered);
        assert_eq!(first, second);
    }
}
