//! # HTTP Server Module
//!
//! Axum application serving the generated CRUD interface.
//!
//! # Endpoints
//!
//! - `GET /` - List page with form, search and pagination
//! - `POST /create`, `POST /update` - Form submissions
//! - `POST /delete?id=` - Delete a record
//! - `GET /get?id=` - Record as JSON for the edit form
//! - `GET /static/main.js` - Client script
//! - `/health` - Health check

pub mod config;
pub mod crud_routes;
pub mod errors;
pub mod server;
pub mod view;

pub use config::HttpServerConfig;
pub use crud_routes::AppState;
pub use errors::{HttpError, HttpResult};
pub use server::HttpServer;
