//! Session lifecycle controller
//!
//! Per plate the lifecycle is Absent → Parked → Absent. [`ParkingLot`] owns
//! the area table and is the only place that allocates or releases slots.
//! It is synchronous and takes `now` from the caller, which keeps it
//! deterministic under test; serialization and I/O are layered on top by
//! [`ParkingService`](super::ParkingService).

use chrono::{DateTime, Utc};
use tracing::error;

use crate::domain::{
    AreaSpec, AreaTable, DomainError, DomainResult, FeeQuote, OccupancyRecord, OccupancyRegistry,
    PlacementEngine, Receipt, RoutingTable, SlotLocation, TariffTable, VehicleClass,
};

/// Static shape of a lot: areas, class routing and tariffs
#[derive(Debug, Clone)]
pub struct LotLayout {
    pub areas: Vec<AreaSpec>,
    pub routes: RoutingTable,
    pub tariffs: TariffTable,
}

/// Outcome of a successful check-in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckIn {
    pub plate: String,
    pub vehicle_class: VehicleClass,
    pub location: SlotLocation,
    pub entry_time: DateTime<Utc>,
}

/// Outcome of a check-out: where the vehicle was and what it owes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOut {
    pub plate: String,
    pub vehicle_class: VehicleClass,
    pub location: SlotLocation,
    pub entry_time: DateTime<Utc>,
    pub exit_time: DateTime<Utc>,
    pub fee: FeeQuote,
}

impl CheckOut {
    pub fn billable_hours(&self) -> u64 {
        self.fee.billable_hours
    }

    pub fn amount(&self) -> u64 {
        self.fee.amount
    }

    pub fn receipt(&self, currency_symbol: &str) -> Receipt {
        Receipt {
            plate: self.plate.clone(),
            vehicle_class: self.vehicle_class,
            location: self.location,
            entry_time: self.entry_time,
            exit_time: self.exit_time,
            billable_hours: self.fee.billable_hours,
            amount: self.fee.amount,
            currency_symbol: currency_symbol.to_string(),
        }
    }
}

/// Occupancy of one area, for overviews
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaOccupancy {
    pub code: char,
    pub capacity: usize,
    pub occupied: usize,
    /// Occupied flag per slot, index order
    pub slots: Vec<bool>,
}

/// A currently parked vehicle and its slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSession {
    pub location: SlotLocation,
    pub record: OccupancyRecord,
}

pub struct ParkingLot {
    table: AreaTable,
    engine: PlacementEngine,
    tariffs: TariffTable,
}

impl ParkingLot {
    /// Build an empty lot, validating the layout.
    pub fn new(layout: LotLayout) -> DomainResult<Self> {
        let table = AreaTable::new(&layout.areas)?;
        layout.routes.validate(&table)?;
        layout.tariffs.validate()?;

        Ok(Self {
            table,
            engine: PlacementEngine::new(layout.routes),
            tariffs: layout.tariffs,
        })
    }

    pub fn table(&self) -> &AreaTable {
        &self.table
    }

    pub fn tariffs(&self) -> &TariffTable {
        &self.tariffs
    }

    pub fn engine(&self) -> &PlacementEngine {
        &self.engine
    }

    /// Park a vehicle. Nothing changes on error.
    pub fn check_in(
        &mut self,
        vehicle_class: VehicleClass,
        plate: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<CheckIn> {
        let plate = normalize_plate(plate)?;

        if let Some((location, _)) = OccupancyRegistry::new(&self.table).find_by_plate(&plate) {
            return Err(DomainError::AlreadyParked { plate, location });
        }

        let location = self.engine.place(&self.table, vehicle_class, &plate)?;
        let record = OccupancyRecord::new(plate.clone(), vehicle_class, now);
        if let Err(e) = self.table.allocate(location, record) {
            error!(error = %e, %location, "Placement chose a slot that cannot be allocated");
            return Err(e);
        }

        Ok(CheckIn {
            plate,
            vehicle_class,
            location,
            entry_time: now,
        })
    }

    /// Locate a parked vehicle and price its stay up to `now`, without
    /// releasing the slot.
    pub fn quote_check_out(&self, plate: &str, now: DateTime<Utc>) -> DomainResult<CheckOut> {
        let plate = plate.trim();
        let (location, record) = OccupancyRegistry::new(&self.table)
            .find_by_plate(plate)
            .ok_or_else(|| DomainError::VehicleNotFound(plate.to_string()))?;

        let fee = self
            .tariffs
            .compute_fee(record.entry_time, now, record.vehicle_class)?;

        Ok(CheckOut {
            plate: record.plate.clone(),
            vehicle_class: record.vehicle_class,
            location,
            entry_time: record.entry_time,
            exit_time: now,
            fee,
        })
    }

    /// Release the slot priced by `quote`. The slot must still hold the same
    /// stay (plate and entry time) the quote was computed from.
    pub fn complete_check_out(&mut self, quote: &CheckOut) -> DomainResult<OccupancyRecord> {
        let current = self.table.inspect(quote.location)?;
        match current {
            Some(record)
                if record.plate == quote.plate && record.entry_time == quote.entry_time => {}
            Some(_) => {
                return Err(DomainError::Validation(format!(
                    "Slot {} no longer holds the quoted stay of {}",
                    quote.location, quote.plate
                )))
            }
            None => return Err(DomainError::SlotEmpty(quote.location)),
        }
        self.table.release(quote.location)
    }

    /// Quote and release in one step.
    pub fn check_out(&mut self, plate: &str, now: DateTime<Utc>) -> DomainResult<CheckOut> {
        let quote = self.quote_check_out(plate, now)?;
        self.complete_check_out(&quote)?;
        Ok(quote)
    }

    pub fn find(&self, plate: &str) -> Option<ActiveSession> {
        OccupancyRegistry::new(&self.table)
            .find_by_plate(plate.trim())
            .map(|(location, record)| ActiveSession {
                location,
                record: record.clone(),
            })
    }

    pub fn active_sessions(&self) -> Vec<ActiveSession> {
        OccupancyRegistry::new(&self.table)
            .active_sessions()
            .into_iter()
            .map(|(location, record)| ActiveSession {
                location,
                record: record.clone(),
            })
            .collect()
    }

    pub fn inspect(&self, location: SlotLocation) -> DomainResult<Option<OccupancyRecord>> {
        Ok(self.table.inspect(location)?.cloned())
    }

    pub fn occupancy(&self) -> Vec<AreaOccupancy> {
        self.table
            .areas()
            .map(|area| AreaOccupancy {
                code: area.code().as_char(),
                capacity: area.capacity(),
                occupied: area.occupied(),
                slots: area.slots().iter().map(Option::is_some).collect(),
            })
            .collect()
    }
}

/// Trim surrounding whitespace; an empty plate is invalid.
fn normalize_plate(plate: &str) -> DomainResult<String> {
    let plate = plate.trim();
    if plate.is_empty() {
        return Err(DomainError::InvalidPlate(plate.to_string()));
    }
    Ok(plate.to_string())
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AreaCode, ClassRouting};
    use chrono::{Duration, TimeZone};

    fn code(c: char) -> AreaCode {
        AreaCode::new(c).unwrap()
    }

    fn layout(a: usize, d: usize) -> LotLayout {
        LotLayout {
            areas: vec![
                AreaSpec::new(code('A'), a),
                AreaSpec::new(code('B'), 4),
                AreaSpec::new(code('C'), 2),
                AreaSpec::new(code('D'), d),
                AreaSpec::new(code('E'), 2),
                AreaSpec::new(code('F'), 1),
            ],
            routes: RoutingTable {
                motor: ClassRouting::new(code('A'), code('D')),
                car: ClassRouting::new(code('B'), code('E')),
                bus: ClassRouting::new(code('C'), code('F')),
            },
            tariffs: TariffTable::new("Rp")
                .with_rate(VehicleClass::Motor, 2000)
                .with_rate(VehicleClass::Car, 3000)
                .with_rate(VehicleClass::Bus, 5000),
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()
    }

    #[test]
    fn check_in_then_out_releases_same_slot() {
        let mut lot = ParkingLot::new(layout(3, 2)).unwrap();
        let check_in = lot.check_in(VehicleClass::Motor, "BH 1234 ZA", t0()).unwrap();
        assert_eq!(check_in.location.to_string(), "A1"); // 1234 % 3 = 1

        let check_out = lot.check_out("BH 1234 ZA", t0()).unwrap();
        assert_eq!(check_out.location, check_in.location);
        assert_eq!(check_out.entry_time, check_in.entry_time);
        assert!(check_out.billable_hours() >= 1);
        assert_eq!(check_out.amount(), 2000);
        assert!(lot.inspect(check_in.location).unwrap().is_none());
        assert!(lot.find("BH 1234 ZA").is_none());
    }

    #[test]
    fn fee_uses_entry_time_and_class() {
        let mut lot = ParkingLot::new(layout(3, 2)).unwrap();
        lot.check_in(VehicleClass::Car, "B 9876 XY", t0()).unwrap();
        let out = lot
            .check_out("B 9876 XY", t0() + Duration::seconds(2 * 3600 + 1))
            .unwrap();
        assert_eq!(out.billable_hours(), 3);
        assert_eq!(out.amount(), 9000);
    }

    #[test]
    fn plate_is_trimmed() {
        let mut lot = ParkingLot::new(layout(3, 2)).unwrap();
        let check_in = lot.check_in(VehicleClass::Motor, "  BH 1234 ZA ", t0()).unwrap();
        assert_eq!(check_in.plate, "BH 1234 ZA");
        assert!(lot.find("BH 1234 ZA").is_some());
        assert!(lot.check_out(" BH 1234 ZA", t0()).is_ok());
    }

    #[test]
    fn empty_and_short_plates_are_invalid() {
        let mut lot = ParkingLot::new(layout(3, 2)).unwrap();
        for plate in ["", "   ", "AB", "AB12"] {
            assert!(matches!(
                lot.check_in(VehicleClass::Car, plate, t0()),
                Err(DomainError::InvalidPlate(_))
            ));
        }
        assert!(lot.active_sessions().is_empty());
    }

    #[test]
    fn duplicate_plate_is_rejected() {
        let mut lot = ParkingLot::new(layout(3, 2)).unwrap();
        let first = lot.check_in(VehicleClass::Motor, "X 1001", t0()).unwrap();
        let err = lot.check_in(VehicleClass::Car, "X 1001", t0()).unwrap_err();
        assert_eq!(
            err,
            DomainError::AlreadyParked {
                plate: "X 1001".into(),
                location: first.location
            }
        );
        assert_eq!(lot.active_sessions().len(), 1);
    }

    #[test]
    fn overflow_then_area_full() {
        let mut lot = ParkingLot::new(layout(3, 1)).unwrap();
        for plate in ["X 1001", "X 1002", "X 1000"] {
            let c = lot.check_in(VehicleClass::Motor, plate, t0()).unwrap();
            assert_eq!(c.location.area, code('A'));
        }
        let overflow = lot.check_in(VehicleClass::Motor, "X 1003", t0()).unwrap();
        assert_eq!(overflow.location.to_string(), "D0");

        for plate in ["Y 0001", "Y 5555"] {
            assert_eq!(
                lot.check_in(VehicleClass::Motor, plate, t0()),
                Err(DomainError::AreaFull(VehicleClass::Motor))
            );
        }
        assert_eq!(lot.active_sessions().len(), 4);
    }

    #[test]
    fn freed_slot_is_reused() {
        let mut lot = ParkingLot::new(layout(3, 1)).unwrap();
        for plate in ["X 1001", "X 1002", "X 1000", "X 1003"] {
            lot.check_in(VehicleClass::Motor, plate, t0()).unwrap();
        }
        let out = lot.check_out("X 1002", t0()).unwrap();
        let again = lot.check_in(VehicleClass::Motor, "Z 4444", t0()).unwrap();
        assert_eq!(again.location, out.location);
    }

    #[test]
    fn unknown_vehicle_on_check_out() {
        let mut lot = ParkingLot::new(layout(3, 2)).unwrap();
        assert_eq!(
            lot.check_out("NOPE 0000", t0()),
            Err(DomainError::VehicleNotFound("NOPE 0000".into()))
        );
    }

    #[test]
    fn quote_does_not_release() {
        let mut lot = ParkingLot::new(layout(3, 2)).unwrap();
        lot.check_in(VehicleClass::Bus, "BUS 7777", t0()).unwrap();
        let quote = lot.quote_check_out("BUS 7777", t0()).unwrap();
        assert!(lot.find("BUS 7777").is_some());
        lot.complete_check_out(&quote).unwrap();
        assert!(lot.find("BUS 7777").is_none());
        assert_eq!(
            lot.complete_check_out(&quote),
            Err(DomainError::SlotEmpty(quote.location))
        );
    }

    #[test]
    fn stale_quote_is_refused() {
        let mut lot = ParkingLot::new(layout(3, 2)).unwrap();
        lot.check_in(VehicleClass::Motor, "X 1001", t0()).unwrap();
        let quote = lot.quote_check_out("X 1001", t0()).unwrap();
        lot.check_out("X 1001", t0()).unwrap();
        // Same slot, different stay.
        lot.check_in(VehicleClass::Motor, "Y 1001", t0()).unwrap();
        assert!(matches!(
            lot.complete_check_out(&quote),
            Err(DomainError::Validation(_))
        ));
        assert!(lot.find("Y 1001").is_some());
    }

    #[test]
    fn no_two_sessions_share_a_slot() {
        let mut lot = ParkingLot::new(layout(5, 3)).unwrap();
        let plates = ["P 0005", "P 0010", "P 0015", "P 0020", "P 0025", "P 0030", "P 0035"];
        for plate in plates {
            lot.check_in(VehicleClass::Motor, plate, t0()).unwrap();
        }
        let sessions = lot.active_sessions();
        assert_eq!(sessions.len(), plates.len());
        for (i, a) in sessions.iter().enumerate() {
            for b in &sessions[i + 1..] {
                assert_ne!(a.location, b.location);
            }
        }
    }

    #[test]
    fn occupancy_overview() {
        let mut lot = ParkingLot::new(layout(3, 2)).unwrap();
        lot.check_in(VehicleClass::Motor, "X 1002", t0()).unwrap();
        let overview = lot.occupancy();
        assert_eq!(overview.len(), 6);
        assert_eq!(overview[0].code, 'A');
        assert_eq!(overview[0].occupied, 1);
        assert_eq!(overview[0].slots, vec![true, false, false]);
    }

    #[test]
    fn invalid_layout_is_rejected() {
        let mut bad = layout(3, 2);
        bad.tariffs = TariffTable::new("Rp").with_rate(VehicleClass::Motor, 2000);
        assert!(ParkingLot::new(bad).is_err());

        let mut bad = layout(3, 2);
        bad.routes.car = ClassRouting::new(code('B'), code('Q'));
        assert!(ParkingLot::new(bad).is_err());
    }
}
