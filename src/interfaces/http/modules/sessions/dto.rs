//! Parking session DTOs

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::application::{ActiveSession, CheckIn, CheckOutOutcome};
use crate::domain::{TariffTable, VehicleClass};

fn validate_vehicle_class(value: &str) -> Result<(), ValidationError> {
    if VehicleClass::from_str(value).is_some() {
        return Ok(());
    }
    let mut err = ValidationError::new("vehicle_class");
    err.message = Some(Cow::Borrowed("must be one of Motor, Car, Bus"));
    Err(err)
}

/// Vehicle arriving at the gate
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CheckInRequest {
    /// License plate, at least 4 digits somewhere in it
    #[validate(length(min = 1, message = "plate is required"))]
    #[schema(example = "BH 1234 ZA")]
    pub plate: String,
    /// `Motor`, `Car` or `Bus` (case-insensitive)
    #[validate(custom(function = "validate_vehicle_class"))]
    #[schema(example = "Car")]
    pub vehicle_class: String,
}

impl CheckInRequest {
    /// Only call after validation.
    pub fn class(&self) -> Option<VehicleClass> {
        VehicleClass::from_str(&self.vehicle_class)
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CheckOutRequest {
    #[validate(length(min = 1, message = "plate is required"))]
    #[schema(example = "BH 1234 ZA")]
    pub plate: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CheckInResponse {
    pub plate: String,
    pub vehicle_class: String,
    pub area: String,
    pub slot_index: usize,
    /// Area and index together, e.g. `B34`
    pub slot: String,
    pub entry_time: DateTime<Utc>,
}

impl From<CheckIn> for CheckInResponse {
    fn from(c: CheckIn) -> Self {
        Self {
            plate: c.plate,
            vehicle_class: c.vehicle_class.to_string(),
            area: c.location.area.to_string(),
            slot_index: c.location.index,
            slot: c.location.to_string(),
            entry_time: c.entry_time,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CheckOutResponse {
    pub plate: String,
    pub vehicle_class: String,
    pub area: String,
    pub slot_index: usize,
    pub slot: String,
    pub entry_time: DateTime<Utc>,
    pub exit_time: DateTime<Utc>,
    pub duration_seconds: i64,
    pub billable_hours: u64,
    pub hourly_rate: u64,
    pub amount: u64,
    /// Amount formatted for display, e.g. `Rp 6,000`
    pub amount_display: String,
    /// Where the receipt was stored
    pub receipt: String,
}

impl CheckOutResponse {
    pub fn from_outcome(outcome: CheckOutOutcome, tariffs: &TariffTable) -> Self {
        let c = outcome.check_out;
        Self {
            amount_display: tariffs.format_amount(c.fee.amount),
            plate: c.plate,
            vehicle_class: c.vehicle_class.to_string(),
            area: c.location.area.to_string(),
            slot_index: c.location.index,
            slot: c.location.to_string(),
            entry_time: c.entry_time,
            exit_time: c.exit_time,
            duration_seconds: c.fee.duration_seconds,
            billable_hours: c.fee.billable_hours,
            hourly_rate: c.fee.hourly_rate,
            amount: c.fee.amount,
            receipt: outcome.receipt_location,
        }
    }
}

/// A vehicle currently parked
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionDto {
    pub plate: String,
    pub vehicle_class: String,
    pub area: String,
    pub slot_index: usize,
    pub slot: String,
    pub entry_time: DateTime<Utc>,
    pub parked_seconds: i64,
}

impl SessionDto {
    pub fn from_session(s: ActiveSession, now: DateTime<Utc>) -> Self {
        Self {
            parked_seconds: s.record.parked_seconds(now),
            plate: s.record.plate,
            vehicle_class: s.record.vehicle_class.to_string(),
            area: s.location.area.to_string(),
            slot_index: s.location.index,
            slot: s.location.to_string(),
            entry_time: s.record.entry_time,
        }
    }
}
