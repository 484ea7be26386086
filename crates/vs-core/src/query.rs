//! # Query plans
//!
//! Listing operations never talk to storage with raw request parameters.
//! They resolve filters, sort and pagination into a [`QueryPlan`] first;
//! repository plugins only have to render the plan.
//!
//! Filters combine with AND. A [`Filter::Contains`] matches if *any* of its
//! fields contains the needle, case-insensitively.

use uuid::Uuid;

use crate::error::{AppError, Result};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;

/// Validated page coordinates (both >= 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    page: u64,
    limit: u64,
}

impl Page {
    pub fn new(page: i64, limit: i64) -> Result<Self> {
        if page < 1 {
            return Err(AppError::invalid("page must be a positive integer"));
        }
        if limit < 1 {
            return Err(AppError::invalid("limit must be a positive integer"));
        }
        Ok(Self {
            page: page as u64,
            limit: limit as u64,
        })
    }

    /// Coerces raw query-string values, falling back to page 1 / limit 10.
    pub fn parse(page: Option<&str>, limit: Option<&str>) -> Result<Self> {
        let page = coerce("page", page, DEFAULT_PAGE)?;
        let limit = coerce("limit", limit, DEFAULT_LIMIT)?;
        Self::new(page, limit)
    }

    pub fn number(&self) -> u64 {
        self.page
    }

    pub fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    pub fn take(&self) -> u64 {
        self.limit
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE as u64,
            limit: DEFAULT_LIMIT as u64,
        }
    }
}

fn coerce(name: &str, raw: Option<&str>, default: i64) -> Result<i64> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(default),
        Some(value) => value
            .parse::<i64>()
            .map_err(|_| AppError::invalid(format!("{name} must be a positive integer"))),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterValue {
    Id(Uuid),
    Bool(bool),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// `field = value`
    Equals {
        field: &'static str,
        value: FilterValue,
    },
    /// Case-insensitive substring match on any of `fields`.
    Contains {
        fields: &'static [&'static str],
        needle: String,
    },
}

impl Filter {
    /// `Some` only when an identifier was supplied.
    pub fn id_equals(field: &'static str, value: Option<Uuid>) -> Option<Filter> {
        value.map(|id| Filter::Equals {
            field,
            value: FilterValue::Id(id),
        })
    }

    pub fn bool_equals(field: &'static str, value: Option<bool>) -> Option<Filter> {
        value.map(|flag| Filter::Equals {
            field,
            value: FilterValue::Bool(flag),
        })
    }

    /// `Some` only when `needle` is present and not blank.
    pub fn contains(fields: &'static [&'static str], needle: Option<&str>) -> Option<Filter> {
        needle
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| Filter::Contains {
                fields,
                needle: value.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// "asc" (any case) is ascending, everything else descending.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("asc") {
            SortDirection::Ascending
        } else {
            SortDirection::Descending
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub field: &'static str,
    pub direction: SortDirection,
}

impl Sort {
    pub fn ascending(field: &'static str) -> Self {
        Self {
            field,
            direction: SortDirection::Ascending,
        }
    }

    /// Resolves a public sort key against `sortable` (public name -> storage field).
    ///
    /// Both `sort_by` and `sort_type` must be present for a sort to apply.
    pub fn parse(
        sort_by: Option<&str>,
        sort_type: Option<&str>,
        sortable: &[(&str, &'static str)],
    ) -> Result<Option<Sort>> {
        let sort_by = sort_by.map(str::trim).filter(|value| !value.is_empty());
        let sort_type = sort_type.map(str::trim).filter(|value| !value.is_empty());
        let (Some(sort_by), Some(sort_type)) = (sort_by, sort_type) else {
            return Ok(None);
        };

        let field = sortable
            .iter()
            .find(|(public, _)| *public == sort_by)
            .map(|(_, field)| *field)
            .ok_or_else(|| AppError::invalid(format!("Cannot sort by '{sort_by}'")))?;

        Ok(Some(Sort {
            field,
            direction: SortDirection::parse(sort_type),
        }))
    }
}

/// Resolved filter + sort + pagination handed to storage.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    pub filters: Vec<Filter>,
    pub sort: Option<Sort>,
    pub skip: u64,
    pub take: u64,
}

impl QueryPlan {
    /// Absent filters (`None`) are dropped.
    pub fn build<I>(filters: I, sort: Option<Sort>, page: Page) -> Self
    where
        I: IntoIterator<Item = Option<Filter>>,
    {
        Self {
            filters: filters.into_iter().flatten().collect(),
            sort,
            skip: page.skip(),
            take: page.take(),
        }
    }
}
