//! Vehicle class and lot addressing types

use serde::{Deserialize, Serialize};

use crate::shared::errors::{DomainError, DomainResult};

/// Vehicle class, decides which pair of areas a vehicle may use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VehicleClass {
    Motor,
    Car,
    Bus,
}

impl VehicleClass {
    pub const ALL: [VehicleClass; 3] = [Self::Motor, Self::Car, Self::Bus];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Motor => "Motor",
            Self::Car => "Car",
            Self::Bus => "Bus",
        }
    }

    /// Case-insensitive parse. "Mobil" is accepted as an alias for `Car`.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "motor" | "motorcycle" => Some(Self::Motor),
            "car" | "mobil" => Some(Self::Car),
            "bus" => Some(Self::Bus),
            _ => None,
        }
    }
}

impl std::fmt::Display for VehicleClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Single-character area identifier, always stored upper-case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AreaCode(char);

impl AreaCode {
    pub fn new(code: char) -> DomainResult<Self> {
        if !code.is_ascii_alphanumeric() {
            return Err(DomainError::Validation(format!(
                "Area code must be an ASCII letter or digit, got {:?}",
                code
            )));
        }
        Ok(Self(code.to_ascii_uppercase()))
    }

    /// Parse from a one-character string such as `"A"`.
    pub fn parse(s: &str) -> DomainResult<Self> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::new(c),
            _ => Err(DomainError::Validation(format!(
                "Area code must be exactly one character, got {:?}",
                s
            ))),
        }
    }

    pub fn as_char(&self) -> char {
        self.0
    }
}

impl std::fmt::Display for AreaCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position of one slot in the lot. Displays as `A17`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotLocation {
    pub area: AreaCode,
    pub index: usize,
}

impl SlotLocation {
    pub fn new(area: AreaCode, index: usize) -> Self {
        Self { area, index }
    }
}

impl std::fmt::Display for SlotLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.area, self.index)
    }
}

// ── Tests ──────────────────────────────────────────────────────
