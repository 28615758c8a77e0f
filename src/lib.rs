//! formforge - a schema-driven CRUD web application
//!
//! A JSON schema describes one table. From it the crate validates and
//! coerces form submissions, formats stored values through display masks,
//! provisions the MySQL table and serves a list/create/edit/delete web
//! interface.

pub mod cli;
pub mod http_server;
pub mod observability;
pub mod record;
pub mod schema;
pub mod store;
pub mod validation;
