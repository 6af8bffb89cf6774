//! Service layer for talking to the back office.
//!
//! Contains the HTTP transport, the non-failing page fetch facade, the
//! error-propagating audit service client, shared fallback fixtures, and
//! the stale-load guard.

pub mod audit_client;
pub mod fetch;
pub mod fixtures;
pub mod load_tracker;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod transport;

pub use audit_client::{AuditService, Collection};
pub use fetch::{LoadReport, LoadState, Loaded, ResilientFetch};
pub use load_tracker::{LoadTicket, LoadTracker};
pub use transport::{CallContext, HttpTransport, Transport, UpstreamRequest, UpstreamResponse};
