//! Tariff DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TariffDto {
    pub vehicle_class: String,
    /// Rate per started hour
    pub hourly_rate: u64,
    /// e.g. `Rp 3,000`
    pub display: String,
    /// Area tried first
    pub primary_area: String,
    /// Area tried when the primary is full
    pub overflow_area: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TariffTableDto {
    pub currency_symbol: String,
    pub rates: Vec<TariffDto>,
}
