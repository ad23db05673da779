// Blog Listings - Core Library
// Exposes the dataset, pagination and summaries to the CLI, API server, and tests

pub mod dataset;
pub mod pagination;
pub mod summary;
pub mod data_quality;
pub mod logging;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use dataset::{brand_of, parse_price, Dataset, PriceError, Record, BUNDLED_DATA};
pub use pagination::{
    paginate, total_pages, Page, PageQuery, PageRequest, PaginationError, DEFAULT_LIMIT,
    DEFAULT_PAGE,
};
pub use summary::{brand_summary, car_counts, car_summary, car_values, GroupStat, GroupSummary};
pub use data_quality::{audit, QualityIssue, QualityReport, Severity};
pub use logging::init_tracing;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
