//! Filter-to-query compiler.
//!
//! Raw query-string parameters are normalized into [`FilterCriteria`], each
//! filter dimension builds its own partial predicate, and [`compile`] merges
//! them into a single [`QueryPlan`] for the repository to execute. Everything
//! in this module is pure and deterministic; the same criteria always compile
//! to the identical plan.

pub mod builders;
pub mod criteria;
pub mod plan;
pub mod predicate;
pub mod sql;

pub use criteria::FilterCriteria;
pub use plan::{Ordering, QueryPlan, SortField, SortOrder};
pub use predicate::Predicate;

/// Compile normalized criteria into a storage-ready query plan.
///
/// Values are OR-combined only within a single dimension; dimensions combine
/// with AND. The offset is derived from the already-clamped page and limit.
pub fn compile(criteria: &FilterCriteria) -> QueryPlan {
    let predicate = Predicate::all(vec![
        builders::search(criteria.search.as_deref()),
        builders::status_set(&criteria.manual_statuses),
        builders::seniority_set(&criteria.seniority_levels),
        builders::recommendation_set(&criteria.ia_recommendations),
        builders::compatibility_range(criteria.min_compatibility, criteria.max_compatibility),
        builders::experience_range(criteria.min_experience, criteria.max_experience),
        builders::created_range(criteria.date_from, criteria.date_to),
        builders::flags(criteria.is_applied, criteria.has_easy_apply),
    ]);

    QueryPlan {
        predicate,
        order: Ordering {
            field: criteria.sort_by,
            order: criteria.sort_order,
        },
        offset: (criteria.page - 1) * criteria.limit,
        limit: criteria.limit,
    }
}
