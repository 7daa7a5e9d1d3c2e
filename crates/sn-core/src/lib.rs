//! sn-core: stable foundation for streamnet.
//!
//! Contains:
//! - ids (flowline identifiers and the outlet sentinel)
//! - numeric (Real + elevation validity bounds + float comparison)
//! - units (uom lengths + unit conversion)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::SnError;
pub use ids::*;
pub use numeric::*;
pub use units::*;
