//! Exit receipt

use chrono::{DateTime, Utc};

use crate::domain::{SlotLocation, VehicleClass};

/// Everything a receipt printer needs about a finished stay.
///
/// The content is fixed here; layout and storage belong to the receipt sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub plate: String,
    pub vehicle_class: VehicleClass,
    pub location: SlotLocation,
    pub entry_time: DateTime<Utc>,
    pub exit_time: DateTime<Utc>,
    pub billable_hours: u64,
    pub amount: u64,
    pub currency_symbol: String,
}
