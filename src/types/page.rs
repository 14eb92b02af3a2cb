//! Pagination for expense listings

use super::error::LedgerError;

/// One page of a listing
///
/// Pages are numbered from 1. The offset of a page is `(number - 1) * limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    number: u32,
    limit: u32,
}

impl Page {
    /// Default page size when none is requested
    pub const DEFAULT_LIMIT: u32 = 10;

    /// Create a page, rejecting a zero page number or zero limit
    pub fn new(number: u32, limit: u32) -> Result<Self, LedgerError> {
        if number == 0 || limit == 0 {
            return Err(LedgerError::InvalidPagination {
                page: number,
                limit,
            });
        }
        Ok(Page { number, limit })
    }

    /// 1-based page number
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Maximum number of items on the page
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of items to skip before this page
    pub fn offset(&self) -> usize {
        (self.number as usize - 1) * self.limit as usize
    }
}

impl Default for Page {
    fn default() -> Self {
        Page {
            number: 1,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}
