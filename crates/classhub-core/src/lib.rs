//! # Classhub Core
//!
//! Query shaping and shared utilities for the classhub API:
//!
//! - [`pagination`]: page/limit/sort resolution for list endpoints
//! - [`coerce`]: lenient query-string coercion helpers
//! - [`files`]: upload rules, stored-file naming, and download links

pub mod coerce;
pub mod files;
pub mod pagination;

pub use files::{FileError, UploadStore};
pub use pagination::{PageQuery, Paginated, PaginationMeta, SortOrder};
