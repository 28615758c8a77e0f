//! # Store
//!
//! Persistence for the single table a schema describes.
//!
//! `RecordRepository` is the seam the HTTP layer talks to. `MySqlRepository`
//! is the production backend; `MemoryRepository` serves tests and
//! `--in-memory` runs.

mod errors;
mod memory;
pub mod migration;
mod mysql;
mod repository;
pub mod sql;

pub use errors::{StoreError, StoreResult};
pub use memory::MemoryRepository;
pub use mysql::{ConnectionOptions, MySqlRepository};
pub use repository::{Page, PageRequest, RecordRepository, DEFAULT_PAGE_SIZE};
