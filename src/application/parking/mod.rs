//! Parking use cases: check-in, check-out and lot queries

pub mod lifecycle;
pub mod service;

pub use lifecycle::{ActiveSession, AreaOccupancy, CheckIn, CheckOut, LotLayout, ParkingLot};
pub use service::{CheckOutOutcome, ParkingService};
