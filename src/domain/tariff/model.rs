//! Tariff table and fee calculation

use std::collections::BTreeMap;

use chrono::{DateTime, TimeDelta, Utc};

use crate::domain::VehicleClass;
use crate::shared::errors::{DomainError, DomainResult};

const SECONDS_PER_HOUR: i64 = 3600;

/// Largest accepted hourly rate. Keeps `hours * rate` far from `u64::MAX`
/// for any realistic stay.
pub const MAX_HOURLY_RATE: u64 = 1_000_000_000_000;

/// Hourly rates per vehicle class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TariffTable {
    /// Rate per started hour, in whole currency units (e.g. Rupiah)
    rates: BTreeMap<VehicleClass, u64>,
    /// Prefix used when printing amounts, e.g. `Rp`
    pub currency_symbol: String,
}

impl TariffTable {
    pub fn new(currency_symbol: impl Into<String>) -> Self {
        Self {
            rates: BTreeMap::new(),
            currency_symbol: currency_symbol.into(),
        }
    }

    pub fn with_rate(mut self, class: VehicleClass, hourly_rate: u64) -> Self {
        self.rates.insert(class, hourly_rate);
        self
    }

    /// Hourly rate for a class. A class without a rate is an error rather
    /// than a free ride.
    pub fn rate(&self, class: VehicleClass) -> DomainResult<u64> {
        self.rates
            .get(&class)
            .copied()
            .ok_or(DomainError::UnknownVehicleClass(class))
    }

    pub fn rates(&self) -> impl Iterator<Item = (VehicleClass, u64)> + '_ {
        self.rates.iter().map(|(class, rate)| (*class, *rate))
    }

    /// Every class has a rate in `1..=MAX_HOURLY_RATE`.
    pub fn validate(&self) -> DomainResult<()> {
        for class in VehicleClass::ALL {
            match self.rates.get(&class).copied() {
                None => {
                    return Err(DomainError::Validation(format!(
                        "No tariff configured for {}",
                        class
                    )))
                }
                Some(0) => {
                    return Err(DomainError::Validation(format!(
                        "Tariff for {} must be positive",
                        class
                    )))
                }
                Some(rate) if rate > MAX_HOURLY_RATE => {
                    return Err(DomainError::Validation(format!(
                        "Tariff for {} exceeds the maximum of {}",
                        class, MAX_HOURLY_RATE
                    )))
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// Billable hours and amount for a stay
    pub fn compute_fee(
        &self,
        entry_time: DateTime<Utc>,
        exit_time: DateTime<Utc>,
        class: VehicleClass,
    ) -> DomainResult<FeeQuote> {
        let rate = self.rate(class)?;
        let stay = exit_time - entry_time;
        let billable_hours = billable_hours(stay);
        let amount = billable_hours.checked_mul(rate).ok_or_else(|| {
            DomainError::Validation(format!(
                "Fee for {} hours at {} per hour is out of range",
                billable_hours, rate
            ))
        })?;

        Ok(FeeQuote {
            duration_seconds: stay.num_seconds(),
            billable_hours,
            hourly_rate: rate,
            amount,
        })
    }

    /// Format an amount as `Rp 12,000`
    pub fn format_amount(&self, amount: u64) -> String {
        format_amount(&self.currency_symbol, amount)
    }
}

/// Started hours for a stay. Any fraction of an hour, down to the
/// nanosecond, rounds up; zero or negative stays (same instant, clock skew)
/// bill one hour.
pub fn billable_hours(stay: TimeDelta) -> u64 {
    if stay <= TimeDelta::zero() {
        return 1;
    }
    let seconds = stay.num_seconds();
    let whole_hours = seconds / SECONDS_PER_HOUR;
    let partial = seconds % SECONDS_PER_HOUR != 0 || stay.subsec_nanos() != 0;
    (whole_hours + i64::from(partial)) as u64
}

/// `symbol` followed by the amount with comma thousands separators
pub fn format_amount(symbol: &str, amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("{} {}", symbol, grouped)
}

/// Result of a fee calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeQuote {
    /// Whole seconds parked, for display. Billing uses the exact stay.
    pub duration_seconds: i64,
    pub billable_hours: u64,
    pub hourly_rate: u64,
    pub amount: u64,
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_tariffs() -> TariffTable {
        TariffTable::new("Rp")
            .with_rate(VehicleClass::Motor, 2000)
            .with_rate(VehicleClass::Car, 3000)
            .with_rate(VehicleClass::Bus, 5000)
    }

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, h, m, s).unwrap()
    }

    #[test]
    fn one_second_bills_one_hour() {
        let quote = sample_tariffs()
            .compute_fee(at(10, 0, 0), at(10, 0, 1), VehicleClass::Motor)
            .unwrap();
        assert_eq!(quote.billable_hours, 1);
        assert_eq!(quote.amount, 2000);
    }

    #[test]
    fn exact_hour_bills_one_hour() {
        let quote = sample_tariffs()
            .compute_fee(at(10, 0, 0), at(11, 0, 0), VehicleClass::Car)
            .unwrap();
        assert_eq!(quote.billable_hours, 1);
        assert_eq!(quote.amount, 3000);
    }

    #[test]
    fn one_second_over_bills_two_hours() {
        let quote = sample_tariffs()
            .compute_fee(at(10, 0, 0), at(11, 0, 1), VehicleClass::Bus)
            .unwrap();
        assert_eq!(quote.billable_hours, 2);
        assert_eq!(quote.amount, 10_000);
    }

    #[test]
    fn sub_second_overrun_starts_a_new_hour() {
        let entry = at(10, 0, 0);
        let exit = entry + TimeDelta::seconds(3600) + TimeDelta::milliseconds(500);
        let quote = sample_tariffs()
            .compute_fee(entry, exit, VehicleClass::Motor)
            .unwrap();
        assert_eq!(quote.billable_hours, 2);
        assert_eq!(quote.amount, 4000);
        assert_eq!(quote.duration_seconds, 3600);

        let tiny = sample_tariffs()
            .compute_fee(entry, entry + TimeDelta::nanoseconds(1), VehicleClass::Motor)
            .unwrap();
        assert_eq!(tiny.billable_hours, 1);
    }

    #[test]
    fn oversized_fee_is_an_error_not_a_panic() {
        let t = TariffTable::new("Rp").with_rate(VehicleClass::Motor, u64::MAX / 2 + 1);
        let result = t.compute_fee(at(10, 0, 0), at(11, 0, 1), VehicleClass::Motor);
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn zero_and_negative_durations_bill_minimum() {
        let t = sample_tariffs();
        let same = t.compute_fee(at(10, 0, 0), at(10, 0, 0), VehicleClass::Motor).unwrap();
        assert_eq!(same.billable_hours, 1);
        let skewed = t.compute_fee(at(10, 0, 0), at(9, 0, 0), VehicleClass::Motor).unwrap();
        assert_eq!(skewed.billable_hours, 1);
        assert_eq!(skewed.duration_seconds, -3600);
    }

    #[test]
    fn missing_rate_is_an_error() {
        let t = TariffTable::new("Rp").with_rate(VehicleClass::Motor, 2000);
        assert_eq!(
            t.compute_fee(at(10, 0, 0), at(11, 0, 0), VehicleClass::Bus),
            Err(DomainError::UnknownVehicleClass(VehicleClass::Bus))
        );
    }

    #[test]
    fn validate_requires_all_positive_rates() {
        assert!(sample_tariffs().validate().is_ok());
        assert!(TariffTable::new("Rp")
            .with_rate(VehicleClass::Motor, 2000)
            .validate()
            .is_err());
        assert!(sample_tariffs()
            .with_rate(VehicleClass::Car, 0)
            .validate()
            .is_err());
        assert!(sample_tariffs()
            .with_rate(VehicleClass::Bus, MAX_HOURLY_RATE)
            .validate()
            .is_ok());
        assert!(sample_tariffs()
            .with_rate(VehicleClass::Bus, MAX_HOURLY_RATE + 1)
            .validate()
            .is_err());
    }

    #[test]
    fn billable_hours_helper() {
        assert_eq!(billable_hours(TimeDelta::zero()), 1);
        assert_eq!(billable_hours(TimeDelta::seconds(-5)), 1);
        assert_eq!(billable_hours(TimeDelta::seconds(3599)), 1);
        assert_eq!(billable_hours(TimeDelta::seconds(7200)), 2);
        assert_eq!(billable_hours(TimeDelta::seconds(7201)), 3);
        assert_eq!(billable_hours(TimeDelta::milliseconds(7_200_001)), 3);
    }

    #[test]
    fn format_amount_groups_thousands() {
        assert_eq!(format_amount("Rp", 0), "Rp 0");
        assert_eq!(format_amount("Rp", 999), "Rp 999");
        assert_eq!(format_amount("Rp", 2000), "Rp 2,000");
        assert_eq!(format_amount("Rp", 1_234_567), "Rp 1,234,567");
        assert_eq!(sample_tariffs().format_amount(15_000), "Rp 15,000");
    }
}
