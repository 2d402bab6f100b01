//! Application configuration
//!
//! Loaded from a TOML file (default `~/.config/smart-parking/config.toml`).
//! Every field has a default, so an empty or missing file yields the stock
//! lot: areas A-F, Motor/Car/Bus routed A/D, B/E, C/F, rates 2000/3000/5000.
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//!
//! [logging]
//! level = "info"
//! format = "text"
//!
//! [parking]
//! currency_symbol = "Rp"
//!
//! [[parking.areas]]
//! code = "A"
//! capacity = 100
//!
//! [parking.routing.motor]
//! primary = "A"
//! overflow = "D"
//!
//! [parking.tariffs]
//! motor = 2000
//! car = 3000
//! bus = 5000
//!
//! [receipts]
//! sink = "file"
//! directory = "/var/lib/smart-parking/receipts"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::application::parking::LotLayout;
use crate::domain::{
    AreaCode, AreaSpec, ClassRouting, DomainResult, RoutingTable, TariffTable, VehicleClass,
};
use crate::shared::errors::{AppError, InfraError};

const APP_DIR: &str = "smart-parking";

/// Default config location, `<config_dir>/smart-parking/config.toml`
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("config.toml")
}

fn default_receipts_dir() -> PathBuf {
    dirs_next::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("receipts")
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub parking: ParkingConfig,
    pub receipts: ReceiptsConfig,
}

// ── Server ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Seconds to wait for in-flight requests on shutdown
    pub shutdown_timeout: u64,
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_timeout: 30,
        }
    }
}

// ── Logging ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `trace`, `debug`, `info`, `warn`, `error` or a full EnvFilter directive
    pub level: String,
    /// `text` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

// ── Parking lot ────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreaConfig {
    pub code: String,
    pub capacity: usize,
}

impl AreaConfig {
    fn new(code: &str, capacity: usize) -> Self {
        Self {
            code: code.to_string(),
            capacity,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteConfig {
    pub primary: String,
    pub overflow: String,
}

impl RouteConfig {
    fn new(primary: &str, overflow: &str) -> Self {
        Self {
            primary: primary.to_string(),
            overflow: overflow.to_string(),
        }
    }

    fn to_routing(&self) -> DomainResult<ClassRouting> {
        Ok(ClassRouting::new(
            AreaCode::parse(&self.primary)?,
            AreaCode::parse(&self.overflow)?,
        ))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    pub motor: RouteConfig,
    pub car: RouteConfig,
    pub bus: RouteConfig,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            motor: RouteConfig::new("A", "D"),
            car: RouteConfig::new("B", "E"),
            bus: RouteConfig::new("C", "F"),
        }
    }
}

/// Hourly rate per class. Without a `[parking.tariffs]` section the stock
/// rates apply; once the section is present every class must be listed, and a
/// class left out is rejected at validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TariffConfig {
    pub motor: Option<u64>,
    pub car: Option<u64>,
    pub bus: Option<u64>,
}

impl Default for TariffConfig {
    fn default() -> Self {
        Self {
            motor: Some(2000),
            car: Some(3000),
            bus: Some(5000),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParkingConfig {
    /// Declared order is the scan order for plate lookups
    pub areas: Vec<AreaConfig>,
    pub routing: RoutingConfig,
    pub tariffs: TariffConfig,
    pub currency_symbol: String,
}

impl Default for ParkingConfig {
    fn default() -> Self {
        Self {
            areas: vec![
                AreaConfig::new("A", 100),
                AreaConfig::new("B", 100),
                AreaConfig::new("C", 50),
                AreaConfig::new("D", 50),
                AreaConfig::new("E", 50),
                AreaConfig::new("F", 10),
            ],
            routing: RoutingConfig::default(),
            tariffs: TariffConfig::default(),
            currency_symbol: "Rp".to_string(),
        }
    }
}

// ── Receipts ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceiptSinkKind {
    File,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiptsConfig {
    pub sink: ReceiptSinkKind,
    pub directory: PathBuf,
    pub title: String,
}

impl Default for ReceiptsConfig {
    fn default() -> Self {
        Self {
            sink: ReceiptSinkKind::File,
            directory: default_receipts_dir(),
            title: crate::infrastructure::receipts::DEFAULT_TITLE.to_string(),
        }
    }
}

// ── Loading ────────────────────────────────────────────────────

impl AppConfig {
    /// Read and validate a config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let config = if path.exists() {
            let raw = std::fs::read_to_string(path).map_err(InfraError::from)?;
            Self::from_toml(&raw)?
        } else {
            info!(path = %path.display(), "Config file not found, using defaults");
            Self::default()
        };

        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> Result<Self, AppError> {
        toml::from_str(raw)
            .map_err(InfraError::from)
            .map_err(AppError::from)
    }

    /// Same checks the lot performs at construction
    pub fn validate(&self) -> DomainResult<()> {
        crate::application::parking::ParkingLot::new(self.to_layout()?).map(|_| ())
    }

    pub fn to_layout(&self) -> DomainResult<LotLayout> {
        let areas = self
            .parking
            .areas
            .iter()
            .map(|a| Ok(AreaSpec::new(AreaCode::parse(&a.code)?, a.capacity)))
            .collect::<DomainResult<Vec<_>>>()?;

        let routes = RoutingTable {
            motor: self.parking.routing.motor.to_routing()?,
            car: self.parking.routing.car.to_routing()?,
            bus: self.parking.routing.bus.to_routing()?,
        };

        let mut tariffs = TariffTable::new(self.parking.currency_symbol.clone());
        let t = &self.parking.tariffs;
        for (class, rate) in [
            (VehicleClass::Motor, t.motor),
            (VehicleClass::Car, t.car),
            (VehicleClass::Bus, t.bus),
        ] {
            if let Some(rate) = rate {
                tariffs = tariffs.with_rate(class, rate);
            }
        }

        Ok(LotLayout {
            areas,
            routes,
            tariffs,
        })
    }
}

// ── Tests ──────────────────────────────────────────────────────
