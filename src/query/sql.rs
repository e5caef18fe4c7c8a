//! Renders a [`QueryPlan`] to PostgreSQL.
//!
//! All user-supplied values go through `push_bind`; the only text spliced
//! into the SQL is allow-listed column names, operators, and the static JSON
//! paths baked into the predicate builders.

use sqlx::{Postgres, QueryBuilder};

use crate::query::plan::QueryPlan;
use crate::query::predicate::{CmpOp, Predicate, Scalar};

const JOB_COLUMNS: &str = "id, job_id, job_url, job_title, company_name, job_description, \
     is_applied, has_easy_apply, overall_compatibility, manual_status, manual_decision_at, \
     manual_notes, recruiter_url, analysis_data, created_at, updated_at";

/// Full SELECT for one dashboard page: WHERE + ORDER BY + LIMIT/OFFSET.
pub fn select_jobs(plan: &QueryPlan) -> QueryBuilder<'static, Postgres> {
    let mut builder =
        QueryBuilder::new(format!("SELECT {JOB_COLUMNS} FROM job_analyses WHERE "));
    push_predicate(&mut builder, &plan.predicate);
    builder.push(" ORDER BY ");
    builder.push(plan.order.field.column());
    builder.push(" ");
    builder.push(plan.order.order.as_sql());
    builder.push(" LIMIT ");
    builder.push_bind(plan.limit);
    builder.push(" OFFSET ");
    builder.push_bind(plan.offset);
    builder
}

/// Single-record lookup by primary key, for the detail view.
pub fn select_job_by_id(id: &str) -> QueryBuilder<'static, Postgres> {
    let mut builder =
        QueryBuilder::new(format!("SELECT {JOB_COLUMNS} FROM job_analyses WHERE id = "));
    builder.push_bind(id.to_owned());
    builder
}

/// COUNT over the same predicate, for the pagination total.
pub fn count_jobs(predicate: &Predicate) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM job_analyses WHERE ");
    push_predicate(&mut builder, predicate);
    builder
}

pub fn push_predicate(builder: &mut QueryBuilder<'static, Postgres>, predicate: &Predicate) {
    match predicate {
        Predicate::True => {
            builder.push("TRUE");
        }
        Predicate::Cmp { field, op, value } => match (op, value) {
            (CmpOp::ContainsInsensitive, Scalar::Str(term)) => {
                builder.push(field.column());
                builder.push(" ILIKE ");
                builder.push_bind(format!("%{}%", escape_like(term)));
            }
            (op, value) => {
                builder.push(field.column());
                builder.push(op_sql(*op));
                push_scalar(builder, value);
            }
        },
        Predicate::JsonCmp { path, op, value } => {
            let path_literal = format!("'{{{}}}'", path.join(","));
            match op {
                // Text comparison on the extracted value; every arm binds its
                // operand so the renderer never emits incomplete SQL.
                CmpOp::Eq | CmpOp::ContainsInsensitive => {
                    builder.push("analysis_data #>> ");
                    builder.push(path_literal);
                    builder.push(op_sql(*op));
                    push_operand(builder, *op, value);
                }
                // Numeric comparison needs a cast; `#>>` yields text.
                CmpOp::Gte | CmpOp::Lte => {
                    builder.push("(analysis_data #>> ");
                    builder.push(path_literal);
                    builder.push(")::numeric");
                    builder.push(op_sql(*op));
                    push_scalar(builder, value);
                }
            }
        }
        Predicate::And(parts) => push_group(builder, parts, " AND "),
        Predicate::Or(parts) => push_group(builder, parts, " OR "),
    }
}

fn push_group(
    builder: &mut QueryBuilder<'static, Postgres>,
    parts: &[Predicate],
    separator: &str,
) {
    builder.push("(");
    for (index, part) in parts.iter().enumerate() {
        if index > 0 {
            builder.push(separator);
        }
        push_predicate(builder, part);
    }
    builder.push(")");
}

fn push_scalar(builder: &mut QueryBuilder<'static, Postgres>, value: &Scalar) {
    match value {
        Scalar::Str(s) => builder.push_bind(s.clone()),
        Scalar::Int(n) => builder.push_bind(*n),
        Scalar::Bool(b) => builder.push_bind(*b),
        Scalar::DateTime(ts) => builder.push_bind(*ts),
    };
}

/// Binds the right-hand side of a text comparison. Substring matches get the
/// escaped `%term%` pattern; everything else binds the scalar as-is, so each
/// operator in the rendered SQL always has a bound operand.
fn push_operand(builder: &mut QueryBuilder<'static, Postgres>, op: CmpOp, value: &Scalar) {
    match (op, value) {
        (CmpOp::ContainsInsensitive, Scalar::Str(term)) => {
            builder.push_bind(format!("%{}%", escape_like(term)));
        }
        (_, value) => push_scalar(builder, value),
    }
}

const fn op_sql(op: CmpOp) -> &'static str {
    match op {
        CmpOp::Eq => " = ",
        CmpOp::Gte => " >= ",
        CmpOp::Lte => " <= ",
        CmpOp::ContainsInsensitive => " ILIKE ",
    }
}

/// Escape LIKE metacharacters so a search for "100%" matches literally.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
