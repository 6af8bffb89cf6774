//! Gateway serving the audit back-office dashboard.
//!
//! The browser shell asks this service for page view models; the service
//! loads them from the back-office REST API, substituting sample data when
//! the back office cannot be reached, and validates form submissions
//! before forwarding them.

pub mod api;
pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod format;
pub mod forms;
pub mod logging;
pub mod middleware;
pub mod pages;
pub mod reconciliation;
pub mod routes;
pub mod services;
pub mod snap;
