//! Observability
//!
//! Structured logging through `tracing`. Library code emits events;
//! the binary installs the subscriber once at startup.

mod logger;

pub use logger::{init_logging, LogFormat};
