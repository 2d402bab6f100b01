//! Parking events
//!
//! Broadcast to notification clients. Payloads are flat and serializable so
//! the WebSocket layer can forward them untouched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Event types for notifications
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Event {
    /// Vehicle checked in and occupies a slot
    VehicleParked(VehicleParkedEvent),
    /// Vehicle checked out, slot released
    VehicleExited(VehicleExitedEvent),
    /// Check-in refused (invalid plate, lot full, duplicate)
    CheckInRejected(CheckInRejectedEvent),
}

impl Event {
    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::VehicleParked(_) => "vehicle_parked",
            Event::VehicleExited(_) => "vehicle_exited",
            Event::CheckInRejected(_) => "check_in_rejected",
        }
    }

    /// Plate the event is about
    pub fn plate(&self) -> &str {
        match self {
            Event::VehicleParked(e) => &e.plate,
            Event::VehicleExited(e) => &e.plate,
            Event::CheckInRejected(e) => &e.plate,
        }
    }

    /// Area code the event touched, if a slot was involved
    pub fn area(&self) -> Option<&str> {
        match self {
            Event::VehicleParked(e) => Some(&e.area),
            Event::VehicleExited(e) => Some(&e.area),
            Event::CheckInRejected(_) => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleParkedEvent {
    pub plate: String,
    pub vehicle_class: String,
    pub area: String,
    pub slot_index: usize,
    pub entry_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleExitedEvent {
    pub plate: String,
    pub vehicle_class: String,
    pub area: String,
    pub slot_index: usize,
    pub entry_time: DateTime<Utc>,
    pub exit_time: DateTime<Utc>,
    pub billable_hours: u64,
    pub amount: u64,
    pub receipt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckInRejectedEvent {
    pub plate: String,
    pub vehicle_class: String,
    pub reason: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Wrapper for sending events with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMessage {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub event: Event,
}

impl EventMessage {
    pub fn new(event: Event) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            event,
        }
    }
}
