//! Lookup of active records by plate
//!
//! There is no plate index: lookups scan the area table, which stays cheap at
//! lot sizes of tens to a few hundred slots.

use crate::domain::{AreaTable, OccupancyRecord, SlotLocation};

/// Read-only view over an [`AreaTable`] for plate lookups
pub struct OccupancyRegistry<'a> {
    table: &'a AreaTable,
}

impl<'a> OccupancyRegistry<'a> {
    pub fn new(table: &'a AreaTable) -> Self {
        Self { table }
    }

    /// First active record with this plate, scanning areas in declared order
    /// and slots in index order.
    pub fn find_by_plate(&self, plate: &str) -> Option<(SlotLocation, &'a OccupancyRecord)> {
        self.table
            .occupied_slots()
            .find(|(_, record)| record.plate == plate)
    }

    pub fn active_sessions(&self) -> Vec<(SlotLocation, &'a OccupancyRecord)> {
        self.table.occupied_slots().collect()
    }
}

// ── Tests ──────────────────────────────────────────────────────
