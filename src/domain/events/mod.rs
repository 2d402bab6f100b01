//! Domain events
//!
//! Facts about what happened in the lot. The EventBus implementation lives
//! in `application::events`.

pub mod types;

pub use types::{
    CheckInRejectedEvent, Event, EventMessage, VehicleExitedEvent, VehicleParkedEvent,
};
