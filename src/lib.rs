#![deny(missing_docs)]

//! Core library for the student roster service.

/// HTTP routing and REST handlers.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// Structured logging and tracing setup.
pub mod logging;
/// Lock-guarded in-memory student records.
pub mod store;
/// Generated student summaries.
pub mod summary;
