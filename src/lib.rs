//! # Smart Parking
//!
//! Slot allocation engine for a multi-area parking lot. Plates hash to a
//! slot in the vehicle class's primary area with linear probing, spill into
//! an overflow area, and pay per started hour on exit.
//!
//! ## Architecture
//!
//! - **domain**: areas, placement, occupancy, tariffs, receipts, events
//! - **application**: the lot state machine, the serialized parking service,
//!   the event bus and the outbound ports (clock, receipt sink)
//! - **infrastructure**: clock and receipt sink adapters, shutdown handling
//! - **interfaces**: REST API with Swagger docs, WebSocket event stream
//! - **server**: runtime bootstrap shared by the binaries

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

pub use application::{create_event_bus, Event, EventBus, ParkingService, SharedEventBus};
pub use interfaces::http::create_api_router;
