//! Vehicle classes and slot addressing

pub mod model;

pub use model::{AreaCode, SlotLocation, VehicleClass};
