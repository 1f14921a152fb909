//! Page/limit handling and result-set metadata.

use crate::errors::ValidationError;
use crate::models::Pagination;

pub const DEFAULT_PAGE_SIZE: u64 = 10;
/// Upper bound on page size; larger requests are clamped, not rejected.
pub const MAX_PAGE_SIZE: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSpec {
    pub page: u64,
    pub limit: u64,
}

impl Default for PageSpec {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageSpec {
    /// Parse `page`/`limit` query values. Non-numeric input is a validation
    /// error; out-of-bounds numeric input is clamped into range.
    pub fn from_raw(
        page: Option<&str>,
        limit: Option<&str>,
    ) -> Result<Self, Vec<ValidationError>> {
        let mut errors = Vec::new();

        let page = match page {
            None => 1,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(n) => n.max(1),
                Err(_) => {
                    errors.push(ValidationError::new(
                        "page",
                        format!("must be a positive number, got '{raw}'"),
                    ));
                    1
                }
            },
        };

        let limit = match limit {
            None => DEFAULT_PAGE_SIZE,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(n) => n.clamp(1, MAX_PAGE_SIZE),
                Err(_) => {
                    errors.push(ValidationError::new(
                        "limit",
                        format!("must be a positive number, got '{raw}'"),
                    ));
                    DEFAULT_PAGE_SIZE
                }
            },
        };

        if errors.is_empty() {
            Ok(Self { page, limit })
        } else {
            Err(errors)
        }
    }

    #[must_use]
    pub const fn skip(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }

    #[must_use]
    pub const fn pages(&self, total: u64) -> u64 {
        total.div_ceil(self.limit)
    }

    /// Assemble the response metadata once the store reported `total`.
    #[must_use]
    pub const fn metadata(&self, total: u64) -> Pagination {
        Pagination {
            page: self.page,
            limit: self.limit,
            total,
            pages: self.pages(total),
        }
    }
}

/// Offset-style continuation flag used by activity-feed endpoints.
#[must_use]
pub const fn has_more(offset: u64, limit: u64, total: u64) -> bool {
    offset.saturating_add(limit) < total
}
