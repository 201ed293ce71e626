//! Translation records service.
//!
//! Accepts text translation requests over HTTP, translates them through an
//! external provider, stores each result as a record and serves the records
//! individually or as a cursor-paginated collection.

pub mod config;
pub mod error;
pub mod i18n;
pub mod routes;
pub mod service;
pub mod store;
pub mod translation;
