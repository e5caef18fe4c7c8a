//! Sort and pagination planning.

use crate::query::predicate::Predicate;

/// Columns the dashboard may sort by. Anything outside this allow-list
/// silently falls back to creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    CreatedAt,
    UpdatedAt,
    OverallCompatibility,
    JobTitle,
    CompanyName,
    ManualStatus,
    ManualDecisionAt,
}

impl SortField {
    pub fn parse(value: Option<&str>) -> Option<Self> {
        match value? {
            "createdAt" => Some(Self::CreatedAt),
            "updatedAt" => Some(Self::UpdatedAt),
            "overallCompatibility" => Some(Self::OverallCompatibility),
            "jobTitle" => Some(Self::JobTitle),
            "companyName" => Some(Self::CompanyName),
            "manualStatus" => Some(Self::ManualStatus),
            "manualDecisionAt" => Some(Self::ManualDecisionAt),
            _ => None,
        }
    }

    /// Name as it appears in the query string.
    pub const fn param_name(self) -> &'static str {
        match self {
            Self::CreatedAt => "createdAt",
            Self::UpdatedAt => "updatedAt",
            Self::OverallCompatibility => "overallCompatibility",
            Self::JobTitle => "jobTitle",
            Self::CompanyName => "companyName",
            Self::ManualStatus => "manualStatus",
            Self::ManualDecisionAt => "manualDecisionAt",
        }
    }

    pub const fn column(self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::OverallCompatibility => "overall_compatibility",
            Self::JobTitle => "job_title",
            Self::CompanyName => "company_name",
            Self::ManualStatus => "manual_status",
            Self::ManualDecisionAt => "manual_decision_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// Only the exact strings "asc" and "desc" are accepted.
    pub fn parse(value: Option<&str>) -> Option<Self> {
        match value? {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }

    pub const fn param_name(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ordering {
    pub field: SortField,
    pub order: SortOrder,
}

/// Everything the storage layer needs to execute one dashboard query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    pub predicate: Predicate,
    pub order: Ordering,
    pub offset: i64,
    pub limit: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_field_allow_list() {
        assert_eq!(
            SortField::parse(Some("overallCompatibility")),
            Some(SortField::OverallCompatibility)
        );
        assert_eq!(SortField::parse(Some("jobDescription")), None);
        assert_eq!(SortField::parse(Some("created_at")), None);
        assert_eq!(SortField::parse(None), None);
    }

    #[test]
    fn sort_order_accepts_only_exact_values() {
        assert_eq!(SortOrder::parse(Some("asc")), Some(SortOrder::Asc));
        assert_eq!(SortOrder::parse(Some("desc")), Some(SortOrder::Desc));
        assert_eq!(SortOrder::parse(Some("ASC")), None);
        assert_eq!(SortOrder::parse(Some("ascending")), None);
        assert_eq!(SortOrder::parse(None), None);
    }

    #[test]
    fn param_names_round_trip() {
        for field in [
            SortField::CreatedAt,
            SortField::UpdatedAt,
            SortField::OverallCompatibility,
            SortField::JobTitle,
            SortField::CompanyName,
            SortField::ManualStatus,
            SortField::ManualDecisionAt,
        ] {
            assert_eq!(SortField::parse(Some(field.param_name())), Some(field));
        }
    }
}
