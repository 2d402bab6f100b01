//! Area table: fixed-capacity slot arrays keyed by area code

use crate::domain::{AreaCode, OccupancyRecord, SlotLocation};
use crate::shared::errors::{DomainError, DomainResult};

/// Declared shape of one area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AreaSpec {
    pub code: AreaCode,
    pub capacity: usize,
}

impl AreaSpec {
    pub fn new(code: AreaCode, capacity: usize) -> Self {
        Self { code, capacity }
    }
}

/// One parking area. Capacity is fixed at construction.
#[derive(Debug, Clone)]
pub struct Area {
    code: AreaCode,
    slots: Vec<Option<OccupancyRecord>>,
}

impl Area {
    pub fn new(code: AreaCode, capacity: usize) -> Self {
        Self {
            code,
            slots: vec![None; capacity],
        }
    }

    pub fn code(&self) -> AreaCode {
        self.code
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn is_free(&self, index: usize) -> bool {
        matches!(self.slots.get(index), Some(None))
    }

    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    pub fn slots(&self) -> &[Option<OccupancyRecord>] {
        &self.slots
    }
}

/// All areas of the lot, in declared order.
///
/// Every mutation of slot state goes through [`AreaTable::allocate`] and
/// [`AreaTable::release`].
#[derive(Debug, Clone)]
pub struct AreaTable {
    areas: Vec<Area>,
}

impl AreaTable {
    pub fn new(specs: &[AreaSpec]) -> DomainResult<Self> {
        if specs.is_empty() {
            return Err(DomainError::Validation(
                "At least one area must be declared".to_string(),
            ));
        }

        let mut areas: Vec<Area> = Vec::with_capacity(specs.len());
        for spec in specs {
            if spec.capacity == 0 {
                return Err(DomainError::Validation(format!(
                    "Area {} must have a positive capacity",
                    spec.code
                )));
            }
            if areas.iter().any(|a| a.code == spec.code) {
                return Err(DomainError::Validation(format!(
                    "Area {} is declared more than once",
                    spec.code
                )));
            }
            areas.push(Area::new(spec.code, spec.capacity));
        }

        Ok(Self { areas })
    }

    pub fn area(&self, code: AreaCode) -> DomainResult<&Area> {
        self.areas
            .iter()
            .find(|a| a.code == code)
            .ok_or(DomainError::UnknownArea(code))
    }

    fn area_mut(&mut self, code: AreaCode) -> DomainResult<&mut Area> {
        self.areas
            .iter_mut()
            .find(|a| a.code == code)
            .ok_or(DomainError::UnknownArea(code))
    }

    pub fn contains(&self, code: AreaCode) -> bool {
        self.areas.iter().any(|a| a.code == code)
    }

    pub fn areas(&self) -> impl Iterator<Item = &Area> {
        self.areas.iter()
    }

    /// Put `record` into an empty slot.
    pub fn allocate(
        &mut self,
        location: SlotLocation,
        record: OccupancyRecord,
    ) -> DomainResult<()> {
        let slot = slot_mut(self.area_mut(location.area)?, location)?;
        if slot.is_some() {
            return Err(DomainError::SlotOccupied(location));
        }
        *slot = Some(record);
        Ok(())
    }

    /// Clear an occupied slot and hand back its record.
    pub fn release(&mut self, location: SlotLocation) -> DomainResult<OccupancyRecord> {
        let slot = slot_mut(self.area_mut(location.area)?, location)?;
        slot.take().ok_or(DomainError::SlotEmpty(location))
    }

    /// Current occupant of a slot, `None` when empty.
    pub fn inspect(&self, location: SlotLocation) -> DomainResult<Option<&OccupancyRecord>> {
        let area = self.area(location.area)?;
        area.slots
            .get(location.index)
            .map(Option::as_ref)
            .ok_or(DomainError::SlotOutOfRange {
                location,
                capacity: area.capacity(),
            })
    }

    /// Every occupied slot, areas in declared order and slots in index order.
    pub fn occupied_slots(&self) -> impl Iterator<Item = (SlotLocation, &OccupancyRecord)> {
        self.areas.iter().flat_map(|area| {
            area.slots.iter().enumerate().filter_map(move |(index, slot)| {
                slot.as_ref()
                    .map(|record| (SlotLocation::new(area.code, index), record))
            })
        })
    }
}

fn slot_mut(area: &mut Area, location: SlotLocation) -> DomainResult<&mut Option<OccupancyRecord>> {
    let capacity = area.capacity();
    area.slots
        .get_mut(location.index)
        .ok_or(DomainError::SlotOutOfRange { location, capacity })
}

// ── Tests ──────────────────────────────────────────────────────
