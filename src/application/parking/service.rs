//! Parking service: serialized entry point to the lot
//!
//! Wraps [`ParkingLot`] in a single async mutex so that "probe then
//! allocate" and "find, store receipt, release" never interleave. Times come
//! from the [`Clock`] port and receipts go to the [`ReceiptSink`] port.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use super::lifecycle::{ActiveSession, AreaOccupancy, CheckIn, CheckOut, ParkingLot};
use crate::application::events::{
    CheckInRejectedEvent, Event, SharedEventBus, VehicleExitedEvent, VehicleParkedEvent,
};
use crate::application::ports::{Clock, ReceiptSink};
use crate::domain::{
    DomainError, DomainResult, OccupancyRecord, RoutingTable, SlotLocation, TariffTable,
    VehicleClass,
};

/// Check-out result together with where the receipt was stored
#[derive(Debug, Clone)]
pub struct CheckOutOutcome {
    pub check_out: CheckOut,
    pub receipt_location: String,
}

pub struct ParkingService {
    lot: Mutex<ParkingLot>,
    tariffs: TariffTable,
    routes: RoutingTable,
    clock: Arc<dyn Clock>,
    receipts: Arc<dyn ReceiptSink>,
    event_bus: SharedEventBus,
}

impl ParkingService {
    pub fn new(
        lot: ParkingLot,
        clock: Arc<dyn Clock>,
        receipts: Arc<dyn ReceiptSink>,
        event_bus: SharedEventBus,
    ) -> Self {
        let tariffs = lot.tariffs().clone();
        let routes = *lot.engine().routes();
        Self {
            lot: Mutex::new(lot),
            tariffs,
            routes,
            clock,
            receipts,
            event_bus,
        }
    }

    pub async fn check_in(
        &self,
        vehicle_class: VehicleClass,
        plate: &str,
    ) -> DomainResult<CheckIn> {
        let mut lot = self.lot.lock().await;
        let now = self.clock.now();

        match lot.check_in(vehicle_class, plate, now) {
            Ok(check_in) => {
                record_area_gauge(&lot, check_in.location);
                drop(lot);

                info!(
                    plate = check_in.plate.as_str(),
                    %vehicle_class,
                    slot = %check_in.location,
                    "Vehicle parked"
                );
                metrics::counter!(
                    "parking_check_ins_total",
                    "class" => vehicle_class.as_str(),
                    "area" => check_in.location.area.to_string()
                )
                .increment(1);

                self.event_bus.publish(Event::VehicleParked(VehicleParkedEvent {
                    plate: check_in.plate.clone(),
                    vehicle_class: vehicle_class.to_string(),
                    area: check_in.location.area.to_string(),
                    slot_index: check_in.location.index,
                    entry_time: check_in.entry_time,
                }));

                Ok(check_in)
            }
            Err(e) => {
                drop(lot);
                log_failure("check-in", plate, &e);
                metrics::counter!(
                    "parking_rejections_total",
                    "operation" => "check_in",
                    "reason" => e.kind()
                )
                .increment(1);

                self.event_bus.publish(Event::CheckInRejected(CheckInRejectedEvent {
                    plate: plate.trim().to_string(),
                    vehicle_class: vehicle_class.to_string(),
                    reason: e.kind().to_string(),
                    message: e.to_string(),
                    timestamp: now,
                }));

                Err(e)
            }
        }
    }

    /// Price the stay, store the receipt, then release the slot. If the
    /// receipt cannot be stored the vehicle stays parked.
    pub async fn check_out(&self, plate: &str) -> DomainResult<CheckOutOutcome> {
        let mut lot = self.lot.lock().await;
        let now = self.clock.now();

        let result = self.finish_check_out(&mut lot, plate, now).await;
        if let Ok(outcome) = &result {
            record_area_gauge(&lot, outcome.check_out.location);
        }
        drop(lot);

        match result {
            Ok(outcome) => {
                let check_out = &outcome.check_out;
                info!(
                    plate = check_out.plate.as_str(),
                    slot = %check_out.location,
                    hours = check_out.billable_hours(),
                    amount = %self.tariffs.format_amount(check_out.amount()),
                    receipt = outcome.receipt_location.as_str(),
                    "Vehicle exited"
                );
                metrics::counter!(
                    "parking_check_outs_total",
                    "class" => check_out.vehicle_class.as_str()
                )
                .increment(1);
                metrics::counter!(
                    "parking_revenue_total",
                    "class" => check_out.vehicle_class.as_str()
                )
                .increment(check_out.amount());

                self.event_bus.publish(Event::VehicleExited(VehicleExitedEvent {
                    plate: check_out.plate.clone(),
                    vehicle_class: check_out.vehicle_class.to_string(),
                    area: check_out.location.area.to_string(),
                    slot_index: check_out.location.index,
                    entry_time: check_out.entry_time,
                    exit_time: check_out.exit_time,
                    billable_hours: check_out.billable_hours(),
                    amount: check_out.amount(),
                    receipt: outcome.receipt_location.clone(),
                }));

                Ok(outcome)
            }
            Err(e) => {
                log_failure("check-out", plate, &e);
                metrics::counter!(
                    "parking_rejections_total",
                    "operation" => "check_out",
                    "reason" => e.kind()
                )
                .increment(1);
                Err(e)
            }
        }
    }

    async fn finish_check_out(
        &self,
        lot: &mut ParkingLot,
        plate: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<CheckOutOutcome> {
        let check_out = lot.quote_check_out(plate, now)?;
        let receipt = check_out.receipt(&self.tariffs.currency_symbol);
        let receipt_location = self.receipts.store(&receipt).await?;
        lot.complete_check_out(&check_out)?;

        Ok(CheckOutOutcome {
            check_out,
            receipt_location,
        })
    }

    pub async fn find(&self, plate: &str) -> Option<ActiveSession> {
        self.lot.lock().await.find(plate)
    }

    pub async fn active_sessions(&self) -> Vec<ActiveSession> {
        self.lot.lock().await.active_sessions()
    }

    pub async fn occupancy(&self) -> Vec<AreaOccupancy> {
        self.lot.lock().await.occupancy()
    }

    pub async fn inspect(&self, location: SlotLocation) -> DomainResult<Option<OccupancyRecord>> {
        self.lot.lock().await.inspect(location)
    }

    pub fn tariffs(&self) -> &TariffTable {
        &self.tariffs
    }

    pub fn routes(&self) -> &RoutingTable {
        &self.routes
    }

    /// Current time on the service clock
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn event_bus(&self) -> &SharedEventBus {
        &self.event_bus
    }
}

fn record_area_gauge(lot: &ParkingLot, location: SlotLocation) {
    if let Ok(area) = lot.table().area(location.area) {
        metrics::gauge!("parking_slots_occupied", "area" => location.area.to_string())
            .set(area.occupied() as f64);
    }
}

fn log_failure(operation: &'static str, plate: &str, e: &DomainError) {
    if e.is_internal() {
        error!(operation, plate, error = %e, "Parking operation failed");
    } else {
        warn!(operation, plate, reason = e.kind(), error = %e, "Parking operation rejected");
    }
}

// ── Tests ──────────────────────────────────────────────────────
