use thiserror::Error;

use crate::domain::{AreaCode, SlotLocation, VehicleClass};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid plate {0:?}: at least 4 digits are required")]
    InvalidPlate(String),

    #[error("All areas for {0} are full")]
    AreaFull(VehicleClass),

    #[error("Vehicle {0} not found")]
    VehicleNotFound(String),

    #[error("Vehicle {plate} is already parked at {location}")]
    AlreadyParked {
        plate: String,
        location: SlotLocation,
    },

    #[error("No tariff configured for vehicle class {0}")]
    UnknownVehicleClass(VehicleClass),

    #[error("Slot {0} is already occupied")]
    SlotOccupied(SlotLocation),

    #[error("Slot {0} is already empty")]
    SlotEmpty(SlotLocation),

    #[error("Area {0} does not exist")]
    UnknownArea(AreaCode),

    #[error("Slot {location} is out of range (capacity {capacity})")]
    SlotOutOfRange {
        location: SlotLocation,
        capacity: usize,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Receipt could not be stored: {0}")]
    Receipt(String),
}

impl DomainError {
    /// Errors that indicate a broken slot invariant rather than a bad request.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            DomainError::SlotOccupied(_) | DomainError::SlotEmpty(_) | DomainError::Receipt(_)
        )
    }

    /// Short machine-readable reason, used for metrics labels and events.
    pub fn kind(&self) -> &'static str {
        match self {
            DomainError::InvalidPlate(_) => "invalid_plate",
            DomainError::AreaFull(_) => "area_full",
            DomainError::VehicleNotFound(_) => "vehicle_not_found",
            DomainError::AlreadyParked { .. } => "already_parked",
            DomainError::UnknownVehicleClass(_) => "unknown_vehicle_class",
            DomainError::SlotOccupied(_) => "slot_occupied",
            DomainError::SlotEmpty(_) => "slot_empty",
            DomainError::UnknownArea(_) => "unknown_area",
            DomainError::SlotOutOfRange { .. } => "slot_out_of_range",
            DomainError::Validation(_) => "validation",
            DomainError::Receipt(_) => "receipt",
        }
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Infra(#[from] InfraError),
}
