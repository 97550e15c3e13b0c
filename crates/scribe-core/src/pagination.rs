//! Offset pagination math for list endpoints.

use scribe_shared::response::Pagination;

use crate::error::DomainError;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 6;
pub const MAX_LIMIT: u64 = 100;

/// Validated page request with defaults applied (page 1, limit 6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    pub fn new(page: Option<u64>, limit: Option<u64>) -> Result<Self, DomainError> {
        let page = page.unwrap_or(DEFAULT_PAGE);
        let limit = limit.unwrap_or(DEFAULT_LIMIT);

        if page < 1 {
            return Err(DomainError::validation("Page must be at least 1"));
        }
        if limit < 1 {
            return Err(DomainError::validation("Limit must be at least 1"));
        }
        if limit > MAX_LIMIT {
            return Err(DomainError::validation("Limit cannot exceed 100"));
        }

        Ok(Self { page, limit })
    }

    /// Number of rows to skip for this page.
    pub fn offset(&self) -> u64 {
        (self.page - 1) * self.limit
    }

    /// Build the response envelope for this request against a total count.
    pub fn envelope(&self, total: u64) -> Pagination {
        let total_pages = total.div_ceil(self.limit);
        Pagination {
            page: self.page,
            limit: self.limit,
            total,
            total_pages,
            has_next: self.page < total_pages,
            has_prev: self.page > 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_absent() {
        let req = PageRequest::new(None, None).unwrap();
        assert_eq!(req.page, 1);
        assert_eq!(req.limit, 6);
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn offset_skips_prior_pages() {
        let req = PageRequest::new(Some(3), Some(10)).unwrap();
        assert_eq!(req.offset(), 20);
    }

    #[test]
    fn twenty_five_rows_at_six_per_page_is_five_pages() {
        let req = PageRequest::new(None, None).unwrap();
        let envelope = req.envelope(25);
        assert_eq!(envelope.total_pages, 5);
    }

    #[test]
    fn last_page_has_prev_but_not_next() {
        let req = PageRequest::new(Some(5), Some(6)).unwrap();
        let envelope = req.envelope(25);
        assert!(!envelope.has_next);
        assert!(envelope.has_prev);
    }

    #[test]
    fn first_page_has_next_but_not_prev() {
        let req = PageRequest::new(Some(1), Some(6)).unwrap();
        let envelope = req.envelope(25);
        assert!(envelope.has_next);
        assert!(!envelope.has_prev);
    }

    #[test]
    fn empty_result_set_has_zero_pages() {
        let req = PageRequest::new(None, None).unwrap();
        let envelope = req.envelope(0);
        assert_eq!(envelope.total_pages, 0);
        assert!(!envelope.has_next);
        assert!(!envelope.has_prev);
    }

    #[test]
    fn bounds_are_enforced() {
        assert!(PageRequest::new(Some(0), None).is_err());
        assert!(PageRequest::new(None, Some(0)).is_err());
        assert!(PageRequest::new(None, Some(101)).is_err());
        assert!(PageRequest::new(None, Some(100)).is_ok());
    }
}
