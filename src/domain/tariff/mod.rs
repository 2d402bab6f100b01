//! Tariff aggregate
//!
//! Hourly rates per vehicle class and the fee calculation.

pub mod model;

pub use model::{billable_hours, format_amount, FeeQuote, TariffTable, MAX_HOURLY_RATE};
