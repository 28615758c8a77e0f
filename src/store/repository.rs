//! # Record Repository
//!
//! CRUD contract over the single table described by the schema.

use async_trait::async_trait;

use super::errors::StoreResult;
use crate::record::{CleanData, FieldValue, Record};

/// Records per list page unless configured otherwise
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// A page of the list view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number
    pub page: usize,
    pub size: usize,
    /// Substring matched against string/text columns; empty for none
    pub search: String,
}

impl PageRequest {
    /// Builds a request from raw query values; pages below 1 clamp to 1.
    pub fn new(page: i64, search: impl Into<String>) -> Self {
        Self {
            page: usize::try_from(page).ok().filter(|p| *p > 0).unwrap_or(1),
            size: DEFAULT_PAGE_SIZE,
            search: search.into(),
        }
    }

    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size.max(1);
        self
    }

    /// Rows skipped before this page, saturating for absurd page numbers
    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.size)
    }

    /// Number of pages needed for `total` records
    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.size as u64)
    }

    pub fn has_search(&self) -> bool {
        !self.search.is_empty()
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, "")
    }
}

/// One page of records plus the number of matching records overall
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub records: Vec<Record>,
    pub total: u64,
}

/// Repository trait for the served table
#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// Insert a record; returns the generated key when the store assigns one
    async fn create(&self, data: &CleanData) -> StoreResult<Option<u64>>;

    /// Update the record identified by `id` with every non-key field in `data`
    async fn update(&self, id: &FieldValue, data: &CleanData) -> StoreResult<()>;

    /// Delete the record identified by `id`
    async fn delete(&self, id: &FieldValue) -> StoreResult<()>;

    /// Fetch a single record
    async fn find_by_id(&self, id: &FieldValue) -> StoreResult<Record>;

    /// Fetch a page of records matching the request's search term
    async fn find_all(&self, request: &PageRequest) -> StoreResult<Page>;
}
