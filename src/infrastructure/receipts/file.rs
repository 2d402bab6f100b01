//! Plain-text ticket files
//!
//! One file per finished stay, named `ticket_<plate>_<exit stamp>.txt`.
//! Existing tickets are never overwritten; a clash gets a `-N` suffix.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, warn};

use crate::application::ports::ReceiptSink;
use crate::domain::tariff::format_amount;
use crate::domain::{DomainError, DomainResult, Receipt};

pub const DEFAULT_TITLE: &str = "PARKING RECEIPT";

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const FILE_STAMP_FORMAT: &str = "%Y%m%d%H%M%S";
/// Upper bound on `-N` suffixes tried for one ticket name
const MAX_NAME_ATTEMPTS: u32 = 1000;

/// Writes each receipt as a text file under `directory`
#[derive(Debug, Clone)]
pub struct FileReceiptSink {
    directory: PathBuf,
    title: String,
}

impl FileReceiptSink {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            title: DEFAULT_TITLE.to_string(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Ticket body, one field per line
    pub fn render(&self, receipt: &Receipt) -> String {
        let header = format!("=== {} ===", self.title);
        let footer = "=".repeat(header.chars().count());

        let mut out = String::new();
        out.push_str(&header);
        out.push('\n');
        out.push_str(&format!("PLATE: {}\n", receipt.plate));
        out.push_str(&format!("CLASS: {}\n", receipt.vehicle_class));
        out.push_str(&format!("SLOT: {}\n", receipt.location));
        out.push_str(&format!("ENTRY: {}\n", receipt.entry_time.format(TIME_FORMAT)));
        out.push_str(&format!("EXIT: {}\n", receipt.exit_time.format(TIME_FORMAT)));
        out.push_str(&format!(
            "DURATION (hours, rounded up): {} h\n",
            receipt.billable_hours
        ));
        out.push_str(&format!(
            "FEE: {}\n",
            format_amount(&receipt.currency_symbol, receipt.amount)
        ));
        out.push_str(&footer);
        out.push('\n');
        out
    }

    pub fn file_name(receipt: &Receipt) -> String {
        Self::numbered_file_name(receipt, 1)
    }

    /// `attempt` 1 is the plain name, later attempts append `-<attempt>`
    fn numbered_file_name(receipt: &Receipt, attempt: u32) -> String {
        let stem = format!(
            "ticket_{}_{}",
            file_safe_plate(&receipt.plate),
            receipt.exit_time.format(FILE_STAMP_FORMAT)
        );
        if attempt <= 1 {
            format!("{}.txt", stem)
        } else {
            format!("{}-{}.txt", stem, attempt)
        }
    }

    /// Create a ticket file that did not exist before and write `body` to it.
    async fn write_new(&self, receipt: &Receipt, body: &str) -> std::io::Result<PathBuf> {
        tokio::fs::create_dir_all(&self.directory).await?;

        for attempt in 1..=MAX_NAME_ATTEMPTS {
            let path = self.directory.join(Self::numbered_file_name(receipt, attempt));
            let opened = tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await;

            match opened {
                Ok(mut file) => {
                    file.write_all(body.as_bytes()).await?;
                    file.flush().await?;
                    return Ok(path);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    warn!(path = %path.display(), "Ticket name taken, trying next suffix");
                }
                Err(e) => return Err(e),
            }
        }

        Err(std::io::Error::new(
            ErrorKind::AlreadyExists,
            format!(
                "{} tickets already exist for {}",
                MAX_NAME_ATTEMPTS,
                Self::file_name(receipt)
            ),
        ))
    }
}

/// Collapse every run of characters that are not letters, digits or `-`
/// into a single `_`, so "B  1234/XY" becomes "B_1234_XY".
fn file_safe_plate(plate: &str) -> String {
    let mut out = String::with_capacity(plate.len());
    let mut in_run = false;
    for c in plate.trim().chars() {
        if c.is_alphanumeric() || c == '-' {
            out.push(c);
            in_run = false;
        } else if !in_run {
            out.push('_');
            in_run = true;
        }
    }
    out
}

#[async_trait]
impl ReceiptSink for FileReceiptSink {
    async fn store(&self, receipt: &Receipt) -> DomainResult<String> {
        match self.write_new(receipt, &self.render(receipt)).await {
            Ok(path) => {
                debug!(path = %path.display(), plate = receipt.plate.as_str(), "Receipt written");
                Ok(path.display().to_string())
            }
            Err(e) => {
                let target = self.directory.join(Self::file_name(receipt));
                error!(path = %target.display(), error = %e, "Failed to write receipt");
                Err(DomainError::Receipt(format!(
                    "cannot write {}: {}",
                    target.display(),
                    e
                )))
            }
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AreaCode, SlotLocation, VehicleClass};
    use chrono::{TimeZone, Utc};

    fn receipt() -> Receipt {
        Receipt {
            plate: "BH 1234  ZA".into(),
            vehicle_class: VehicleClass::Car,
            location: SlotLocation::new(AreaCode::new('B').unwrap(), 34),
            entry_time: Utc.with_ymd_and_hms(2024, 3, 9, 8, 15, 0).unwrap(),
            exit_time: Utc.with_ymd_and_hms(2024, 3, 9, 10, 20, 5).unwrap(),
            billable_hours: 3,
            amount: 9000,
            currency_symbol: "Rp".into(),
        }
    }

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("parking-receipts-{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn renders_ticket_lines() {
        let text = FileReceiptSink::new("unused").render(&receipt());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "=== PARKING RECEIPT ===",
                "PLATE: BH 1234  ZA",
                "CLASS: Car",
                "SLOT: B34",
                "ENTRY: 2024-03-09 08:15:00",
                "EXIT: 2024-03-09 10:20:05",
                "DURATION (hours, rounded up): 3 h",
                "FEE: Rp 9,000",
                "=======================",
            ]
        );
    }

    #[test]
    fn custom_title_sizes_footer() {
        let text = FileReceiptSink::new("unused")
            .with_title("LOT 7")
            .render(&receipt());
        assert!(text.starts_with("=== LOT 7 ===\n"));
        assert!(text.ends_with("\n=============\n"));
    }

    #[test]
    fn file_name_collapses_separators() {
        assert_eq!(
            FileReceiptSink::file_name(&receipt()),
            "ticket_BH_1234_ZA_20240309102005.txt"
        );
        assert_eq!(file_safe_plate("../B/1234"), "_B_1234");
    }

    #[tokio::test]
    async fn store_writes_file() {
        let dir = scratch_dir();
        let sink = FileReceiptSink::new(&dir);

        let location = sink.store(&receipt()).await.unwrap();
        assert!(location.ends_with("ticket_BH_1234_ZA_20240309102005.txt"));

        let content = tokio::fs::read_to_string(&location).await.unwrap();
        assert!(content.contains("FEE: Rp 9,000"));

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn clashing_names_get_distinct_files() {
        let dir = scratch_dir();
        let sink = FileReceiptSink::new(&dir);

        let first = receipt();
        let mut second = receipt();
        second.plate = "BH/1234/ZA".into();
        assert_eq!(
            FileReceiptSink::file_name(&first),
            FileReceiptSink::file_name(&second)
        );

        let a = sink.store(&first).await.unwrap();
        let b = sink.store(&second).await.unwrap();
        let c = sink.store(&first).await.unwrap();
        assert_ne!(a, b);
        assert!(b.ends_with("ticket_BH_1234_ZA_20240309102005-2.txt"));
        assert!(c.ends_with("ticket_BH_1234_ZA_20240309102005-3.txt"));

        let text_a = tokio::fs::read_to_string(&a).await.unwrap();
        let text_b = tokio::fs::read_to_string(&b).await.unwrap();
        assert!(text_a.contains("PLATE: BH 1234  ZA"));
        assert!(text_b.contains("PLATE: BH/1234/ZA"));

        let mut entries = tokio::fs::read_dir(&dir).await.unwrap();
        let mut count = 0;
        while entries.next_entry().await.unwrap().is_some() {
            count += 1;
        }
        assert_eq!(count, 3);

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn store_reports_io_failure() {
        let dir = scratch_dir();
        tokio::fs::write(&dir, b"not a directory").await.unwrap();

        let err = FileReceiptSink::new(&dir).store(&receipt()).await.unwrap_err();
        assert!(matches!(err, DomainError::Receipt(_)));

        tokio::fs::remove_file(&dir).await.unwrap();
    }
}
