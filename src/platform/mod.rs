//! Platform-specific data sources.
//!
//! Everything that talks to a driver, a sensor tree, or an external binary
//! lives here; the engine consumes these through the backend traits in
//! `core::engine`.

pub mod gpu;
pub mod sensors;
