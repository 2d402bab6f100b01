//! Outbound ports: capabilities the parking core consumes
//!
//! [`Clock`] stamps entry and exit times; [`ReceiptSink`] stores the receipt
//! produced on check-out and reports where it went. Production adapters live
//! in `infrastructure`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{DomainResult, Receipt};

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Persists receipts. Returns a storage location (file path, key, ...).
///
/// Failures are reported as [`DomainError::Receipt`](crate::domain::DomainError::Receipt).
#[async_trait]
pub trait ReceiptSink: Send + Sync {
    async fn store(&self, receipt: &Receipt) -> DomainResult<String>;
}
