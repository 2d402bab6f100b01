//! In-memory receipt store for development and testing

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::application::ports::ReceiptSink;
use crate::domain::{DomainResult, Receipt};

#[derive(Debug, Default)]
pub struct InMemoryReceiptSink {
    receipts: RwLock<Vec<Receipt>>,
    counter: AtomicU64,
}

impl InMemoryReceiptSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored receipts, oldest first
    pub async fn receipts(&self) -> Vec<Receipt> {
        self.receipts.read().await.clone()
    }
}

#[async_trait]
impl ReceiptSink for InMemoryReceiptSink {
    async fn store(&self, receipt: &Receipt) -> DomainResult<String> {
        let mut receipts = self.receipts.write().await;
        receipts.push(receipt.clone());
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("memory://receipts/{}", n))
    }
}
