// Pagination - page/limit parsing and slicing
// startIndex = (page-1)*limit, endIndex = startIndex+limit, totalPages = ceil(total/limit)

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_LIMIT: usize = 12;

/// Raw `?page=&limit=` query; parsed by [`PageRequest::from_query`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    #[error("{param} must be a positive integer, got {value:?}")]
    NotANumber { param: &'static str, value: String },

    #[error("{param} must be at least 1")]
    Zero { param: &'static str },
}

/// A validated page request: both fields are >= 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: usize,
    limit: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    pub fn new(page: usize, limit: usize) -> Result<Self, PaginationError> {
        if page == 0 {
            return Err(PaginationError::Zero { param: "page" });
        }
        if limit == 0 {
            return Err(PaginationError::Zero { param: "limit" });
        }
        Ok(PageRequest { page, limit })
    }

    /// Absent or empty values fall back to the defaults.
    pub fn from_query(query: &PageQuery) -> Result<Self, PaginationError> {
        let page = parse_param("page", query.page.as_deref(), DEFAULT_PAGE)?;
        let limit = parse_param("limit", query.limit.as_deref(), DEFAULT_LIMIT)?;
        Self::new(page, limit)
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn start_index(&self) -> usize {
        (self.page - 1).saturating_mul(self.limit)
    }

    pub fn end_index(&self) -> usize {
        self.start_index().saturating_add(self.limit)
    }
}

fn parse_param(
    param: &'static str,
    raw: Option<&str>,
    default: usize,
) -> Result<usize, PaginationError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => value.parse().map_err(|_| PaginationError::NotANumber {
            param,
            value: value.to_string(),
        }),
    }
}

/// One page of results, in the wire shape `{ blogs, totalPages, totalItems }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub blogs: Vec<T>,
    pub total_pages: usize,
    pub total_items: usize,
}

pub fn total_pages(total_items: usize, limit: usize) -> usize {
    total_items.div_ceil(limit)
}

/// Slice `items` for `request`. Out-of-range pages are empty, never an error.
pub fn paginate<T: Clone>(items: &[T], request: PageRequest) -> Page<T> {
    let total_items = items.len();
    let start = request.start_index().min(total_items);
    let end = request.end_index().min(total_items);

    Page {
        blogs: items[start..end].to_vec(),
        total_pages: total_pages(total_items, request.limit()),
        total_items,
    }
}
