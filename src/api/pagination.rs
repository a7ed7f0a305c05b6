// src/api/pagination.rs
// Page-number pagination shared by every list endpoint.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// List envelope: `count` is the total after filtering, `results` one page.
#[derive(Debug, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub count: i64,
    pub results: Vec<T>,
}

/// Translate 1-based `page`/`page_size` parameters into LIMIT/OFFSET.
pub fn limit_offset(page: Option<u32>, page_size: Option<u32>) -> (i64, i64) {
    let page = page.unwrap_or(1).max(1);
    let size = page_size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    (i64::from(size), i64::from(page - 1) * i64::from(size))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(limit_offset(None, None), (20, 0));
    }

    #[test]
    fn test_second_page() {
        assert_eq!(limit_offset(Some(2), Some(10)), (10, 10));
    }

    #[test]
    fn test_page_size_is_capped() {
        assert_eq!(limit_offset(Some(1), Some(500)), (100, 0));
    }

    #[test]
    fn test_page_zero_treated_as_first() {
        assert_eq!(limit_offset(Some(0), Some(5)), (5, 0));
    }
}
