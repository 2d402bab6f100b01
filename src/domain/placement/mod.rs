//! Placement engine
//!
//! Plate-keyed hashing with linear probing over a primary and an overflow
//! area per vehicle class.

pub mod engine;

pub use engine::{plate_key, probe, ClassRouting, PlacementEngine, RoutingTable, KEY_DIGITS};
