//! Occupancy aggregate
//!
//! The record held by an occupied slot, and the plate registry over the
//! area table.

pub mod model;
pub mod registry;

pub use model::OccupancyRecord;
pub use registry::OccupancyRegistry;
