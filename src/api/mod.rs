//! Response envelopes shared by the route handlers

pub mod response;

pub use response::{Created, DataResponse, NoContent};
