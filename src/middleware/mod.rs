//! Middleware and request extractors

pub mod caller;
pub mod request_id;

pub use caller::{Caller, X_VIEW_ID};
pub use request_id::{request_id_layer, X_REQUEST_ID};
