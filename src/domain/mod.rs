//! Parking domain
//!
//! - `vehicle`: vehicle classes and slot addressing
//! - `area`: the area table, sole owner of slot state
//! - `occupancy`: occupancy records and the plate registry
//! - `placement`: plate hashing with linear probing and overflow
//! - `tariff`: hourly rates and fee calculation
//! - `receipt`: exit receipt content
//! - `events`: parking events for notification clients

pub mod area;
pub mod events;
pub mod occupancy;
pub mod placement;
pub mod receipt;
pub mod tariff;
pub mod vehicle;

pub use area::{Area, AreaSpec, AreaTable};
pub use events::{Event, EventMessage};
pub use occupancy::{OccupancyRecord, OccupancyRegistry};
pub use placement::{ClassRouting, PlacementEngine, RoutingTable};
pub use receipt::Receipt;
pub use tariff::{FeeQuote, TariffTable};
pub use vehicle::{AreaCode, SlotLocation, VehicleClass};

pub use crate::shared::errors::{DomainError, DomainResult};
