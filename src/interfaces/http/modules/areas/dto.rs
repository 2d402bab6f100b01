//! Area overview and slot DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::AreaOccupancy;
use crate::domain::{OccupancyRecord, SlotLocation};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AreaDto {
    pub code: String,
    pub capacity: usize,
    pub occupied: usize,
    pub free: usize,
    /// Indices currently holding a vehicle
    pub occupied_slots: Vec<usize>,
}

impl From<AreaOccupancy> for AreaDto {
    fn from(a: AreaOccupancy) -> Self {
        Self {
            code: a.code.to_string(),
            capacity: a.capacity,
            occupied: a.occupied,
            free: a.capacity - a.occupied,
            occupied_slots: a
                .slots
                .iter()
                .enumerate()
                .filter_map(|(i, taken)| taken.then_some(i))
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OccupantDto {
    pub plate: String,
    pub vehicle_class: String,
    pub entry_time: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SlotDto {
    pub area: String,
    pub index: usize,
    pub slot: String,
    pub occupied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupant: Option<OccupantDto>,
}

impl SlotDto {
    pub fn new(location: SlotLocation, record: Option<OccupancyRecord>) -> Self {
        Self {
            area: location.area.to_string(),
            index: location.index,
            slot: location.to_string(),
            occupied: record.is_some(),
            occupant: record.map(|r| OccupantDto {
                plate: r.plate,
                vehicle_class: r.vehicle_class.to_string(),
                entry_time: r.entry_time,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn area_dto_lists_taken_indices() {
        let dto = AreaDto::from(AreaOccupancy {
            code: 'A',
            capacity: 4,
            occupied: 2,
            slots: vec![false, true, false, true],
        });
        assert_eq!(dto.free, 2);
        assert_eq!(dto.occupied_slots, vec![1, 3]);
    }
}
