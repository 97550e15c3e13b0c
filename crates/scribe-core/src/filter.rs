//! Compiles sparse query parameters into a normalized post predicate.

use chrono::{DateTime, Datelike, TimeZone, Utc};

use crate::error::DomainError;

const MAX_SEARCH_LEN: usize = 100;

/// Raw, optional filter parameters as they arrive from the query string.
#[derive(Debug, Clone, Default)]
pub struct PostFilters {
    pub month: Option<u32>,
    pub year: Option<i32>,
    pub search: Option<String>,
    pub category_id: Option<i32>,
    pub tag_id: Option<i32>,
}

/// Normalized predicate description consumed by the store. Clauses are
/// independent and AND-combined; `None` everywhere selects all posts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostQuery {
    /// Case-insensitive substring match on the title.
    pub title_contains: Option<String>,
    /// Half-open creation-time range `[start, end)`.
    pub created_within: Option<(DateTime<Utc>, DateTime<Utc>)>,
    pub category_id: Option<i32>,
    pub tag_id: Option<i32>,
}

impl PostFilters {
    /// Validate the parameters and compile them into a [`PostQuery`].
    ///
    /// `now` resolves the year when `month` is supplied without one. A month
    /// clause always supersedes the plain year range: `month=3&year=2020`
    /// narrows to March 2020, never the whole of 2020.
    pub fn compile(&self, now: DateTime<Utc>) -> Result<PostQuery, DomainError> {
        if let Some(month) = self.month {
            if !(1..=12).contains(&month) {
                return Err(DomainError::validation("Month must be between 1-12"));
            }
        }
        if let Some(year) = self.year {
            if year < 1900 {
                return Err(DomainError::validation("Year must be at least 1900"));
            }
            if year > 2100 {
                return Err(DomainError::validation("Year cannot exceed 2100"));
            }
        }
        if let Some(search) = &self.search {
            if search.chars().count() > MAX_SEARCH_LEN {
                return Err(DomainError::validation("Search term too long"));
            }
        }
        if matches!(self.category_id, Some(id) if id < 1) {
            return Err(DomainError::validation(
                "Category ID must be a positive integer",
            ));
        }
        if matches!(self.tag_id, Some(id) if id < 1) {
            return Err(DomainError::validation("Tag ID must be a positive integer"));
        }

        let created_within = match (self.month, self.year) {
            (Some(month), year) => Some(month_range(year.unwrap_or_else(|| now.year()), month)?),
            (None, Some(year)) => Some(year_range(year)?),
            (None, None) => None,
        };

        Ok(PostQuery {
            title_contains: self
                .search
                .as_deref()
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            created_within,
            category_id: self.category_id,
            tag_id: self.tag_id,
        })
    }
}

fn month_range(year: i32, month: u32) -> Result<(DateTime<Utc>, DateTime<Utc>), DomainError> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    Ok((utc_midnight(year, month)?, utc_midnight(next_year, next_month)?))
}

fn year_range(year: i32) -> Result<(DateTime<Utc>, DateTime<Utc>), DomainError> {
    Ok((utc_midnight(year, 1)?, utc_midnight(year + 1, 1)?))
}

fn utc_midnight(year: i32, month: u32) -> Result<DateTime<Utc>, DomainError> {
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .ok_or_else(|| DomainError::validation("Month must be between 1-12"))
}
