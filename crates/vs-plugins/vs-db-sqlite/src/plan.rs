//! Renders a [`QueryPlan`] into SQL.
//!
//! Field names come from the plan as `&'static str`; they are still checked
//! against the table's column list before being spliced into the statement.

use sqlx::{QueryBuilder, Sqlite};
use vs_core::error::{AppError, Result};
use vs_core::query::{Filter, FilterValue, QueryPlan, SortDirection};

/// Appends `WHERE .. ORDER BY .. LIMIT .. OFFSET ..` for `plan`.
///
/// Rows with equal sort keys keep insertion order.
pub(crate) fn push_plan(
    builder: &mut QueryBuilder<'_, Sqlite>,
    plan: &QueryPlan,
    columns: &[&str],
) -> Result<()> {
    for (index, filter) in plan.filters.iter().enumerate() {
        builder.push(if index == 0 { " WHERE " } else { " AND " });
        match filter {
            Filter::Equals { field, value } => {
                builder.push(column(field, columns)?).push(" = ");
                match value {
                    FilterValue::Id(id) => builder.push_bind(*id),
                    FilterValue::Bool(flag) => builder.push_bind(*flag),
                };
            }
            Filter::Contains { fields, needle } => {
                let pattern = contains_pattern(needle);
                builder.push("(");
                for (position, field) in fields.iter().enumerate() {
                    if position > 0 {
                        builder.push(" OR ");
                    }
                    builder
                        .push(column(field, columns)?)
                        .push(" REGEXP ")
                        .push_bind(pattern.clone());
                }
                builder.push(")");
            }
        }
    }

    builder.push(" ORDER BY ");
    if let Some(sort) = plan.sort {
        let direction = match sort.direction {
            SortDirection::Ascending => " ASC",
            SortDirection::Descending => " DESC",
        };
        builder.push(column(sort.field, columns)?).push(direction).push(", ");
    }
    builder.push("rowid ASC");

    builder
        .push(" LIMIT ")
        .push_bind(i64::try_from(plan.take).unwrap_or(i64::MAX))
        .push(" OFFSET ")
        .push_bind(i64::try_from(plan.skip).unwrap_or(i64::MAX));
    Ok(())
}

fn column<'a>(field: &'a str, columns: &[&str]) -> Result<&'a str> {
    if columns.contains(&field) {
        Ok(field)
    } else {
        Err(AppError::internal(format!("unsupported query field '{field}'")))
    }
}

/// Literal, Unicode case-insensitive substring match for `REGEXP`.
///
/// SQLite's `LIKE` only folds ASCII, so "émile" would miss "Émile".
fn contains_pattern(needle: &str) -> String {
    format!("(?i){}", regex::escape(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;
    use vs_core::query::{Page, Sort};

    const COLUMNS: &[&str] = &["owner_id", "title", "description", "views"];
    const TEXT: &[&str] = &["title", "description"];

    #[test]
    fn needle_is_matched_literally() {
        assert_eq!(contains_pattern("c++ (2024)"), "(?i)c\\+\\+ \\(2024\\)");
        assert_eq!(contains_pattern("50%_off"), "(?i)50%_off");
    }

    #[test]
    fn renders_filters_sort_and_page() {
        let plan = QueryPlan::build(
            [
                Filter::id_equals("owner_id", Some(Uuid::now_v7())),
                Filter::contains(TEXT, Some("rust")),
            ],
            Some(Sort {
                field: "views",
                direction: SortDirection::Descending,
            }),
            Page::new(2, 5).unwrap(),
        );
        let mut builder = QueryBuilder::<Sqlite>::new("SELECT * FROM videos");
        push_plan(&mut builder, &plan, COLUMNS).unwrap();
        assert_eq!(
            builder.sql(),
            "SELECT * FROM videos WHERE owner_id = ? AND (title REGEXP ? OR description REGEXP ?) ORDER BY views DESC, rowid ASC LIMIT ? OFFSET ?"
        );
    }

    #[test]
    fn unknown_field_is_rejected() {
        let plan = QueryPlan::build(
            [Filter::bool_equals("password", Some(true))],
            None,
            Page::default(),
        );
        let mut builder = QueryBuilder::<Sqlite>::new("SELECT * FROM videos");
        assert!(push_plan(&mut builder, &plan, COLUMNS).is_err());
    }
}
