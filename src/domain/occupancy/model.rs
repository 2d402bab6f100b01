//! Occupancy record entity

use chrono::{DateTime, Utc};

use crate::domain::VehicleClass;

/// A vehicle currently parked in a slot.
///
/// Owned by the slot that holds it: created on check-in and dropped when the
/// slot is released on check-out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancyRecord {
    pub plate: String,
    pub vehicle_class: VehicleClass,
    pub entry_time: DateTime<Utc>,
}

impl OccupancyRecord {
    pub fn new(
        plate: impl Into<String>,
        vehicle_class: VehicleClass,
        entry_time: DateTime<Utc>,
    ) -> Self {
        Self {
            plate: plate.into(),
            vehicle_class,
            entry_time,
        }
    }

    /// Seconds parked until `now`. Negative on clock skew.
    pub fn parked_seconds(&self, now: DateTime<Utc>) -> i64 {
        (now - self.entry_time).num_seconds()
    }
}
