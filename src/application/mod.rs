pub mod events;
pub mod parking;
pub mod ports;

// Re-export key types for convenience
pub use events::{create_event_bus, Event, EventBus, EventSubscriber, SharedEventBus};
pub use parking::{
    ActiveSession, AreaOccupancy, CheckIn, CheckOut, CheckOutOutcome, LotLayout, ParkingLot,
    ParkingService,
};
pub use ports::{Clock, ReceiptSink};
