//! Domain types and DTOs
//!
//! Records exchanged with the back-office REST API. They carry no
//! behaviour beyond a few derived figures; referential integrity is the
//! back office's concern.

pub mod audit;
pub mod common;
pub mod engagements;
pub mod finance;
pub mod operations;
pub mod reconciliations;
pub mod workpapers;

// Re-export commonly used types
pub use audit::*;
pub use common::*;
pub use engagements::*;
pub use finance::*;
pub use operations::*;
pub use reconciliations::*;
pub use workpapers::*;
