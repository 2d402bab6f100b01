//! Hash placement with linear probing
//!
//! The last four digits of a plate form the key. A vehicle starts probing at
//! `key mod capacity` in its class's primary area, walks forward with
//! wraparound, and falls back to the overflow area with that area's own
//! modulus.

use tracing::debug;

use crate::domain::{Area, AreaCode, AreaTable, SlotLocation, VehicleClass};
use crate::shared::errors::{DomainError, DomainResult};

/// Number of trailing plate digits that make up the placement key
pub const KEY_DIGITS: usize = 4;

/// Primary and overflow area for one vehicle class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassRouting {
    pub primary: AreaCode,
    pub overflow: AreaCode,
}

impl ClassRouting {
    pub fn new(primary: AreaCode, overflow: AreaCode) -> Self {
        Self { primary, overflow }
    }
}

/// Routing for every vehicle class. Total over [`VehicleClass`] by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutingTable {
    pub motor: ClassRouting,
    pub car: ClassRouting,
    pub bus: ClassRouting,
}

impl RoutingTable {
    pub fn route(&self, class: VehicleClass) -> ClassRouting {
        match class {
            VehicleClass::Motor => self.motor,
            VehicleClass::Car => self.car,
            VehicleClass::Bus => self.bus,
        }
    }

    /// Check that every route points at two distinct declared areas.
    pub fn validate(&self, table: &AreaTable) -> DomainResult<()> {
        for class in VehicleClass::ALL {
            let route = self.route(class);
            if route.primary == route.overflow {
                return Err(DomainError::Validation(format!(
                    "{} primary and overflow area must differ (both {})",
                    class, route.primary
                )));
            }
            for code in [route.primary, route.overflow] {
                if !table.contains(code) {
                    return Err(DomainError::Validation(format!(
                        "{} is routed to undeclared area {}",
                        class, code
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Derive the placement key from a plate.
///
/// All ASCII digits in the plate are concatenated; the last [`KEY_DIGITS`] of
/// them are the key. `"BH 1234 ZA"` yields `1234`, `"B 12 345"` yields `2345`.
pub fn plate_key(plate: &str) -> DomainResult<u32> {
    let digits: Vec<u32> = plate.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() < KEY_DIGITS {
        return Err(DomainError::InvalidPlate(plate.to_string()));
    }
    Ok(digits[digits.len() - KEY_DIGITS..]
        .iter()
        .fold(0, |key, digit| key * 10 + digit))
}

/// First free index when probing `area` from `key mod capacity`, visiting
/// every index once.
pub fn probe(area: &Area, key: u32) -> Option<usize> {
    let capacity = area.capacity();
    if capacity == 0 {
        return None;
    }
    let start = key as usize % capacity;
    (0..capacity)
        .map(|step| (start + step) % capacity)
        .find(|&index| area.is_free(index))
}

/// Chooses a slot for a vehicle without mutating the table
#[derive(Debug, Clone)]
pub struct PlacementEngine {
    routes: RoutingTable,
}

impl PlacementEngine {
    pub fn new(routes: RoutingTable) -> Self {
        Self { routes }
    }

    pub fn routes(&self) -> &RoutingTable {
        &self.routes
    }

    /// Target slot for `plate`, primary area first, then overflow.
    pub fn place(
        &self,
        table: &AreaTable,
        class: VehicleClass,
        plate: &str,
    ) -> DomainResult<SlotLocation> {
        let key = plate_key(plate)?;
        let route = self.routes.route(class);

        for code in [route.primary, route.overflow] {
            let area = table.area(code)?;
            if let Some(index) = probe(area, key) {
                debug!(plate, %class, key, area = %code, index, "Placement found");
                return Ok(SlotLocation::new(code, index));
            }
            debug!(plate, %class, area = %code, "Area full, trying next");
        }

        Err(DomainError::AreaFull(class))
    }
}

// ── Tests ──────────────────────────────────────────────────────
