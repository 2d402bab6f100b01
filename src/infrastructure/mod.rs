//! Infrastructure layer - external concerns

pub mod clock;
pub mod receipts;
pub mod server;

pub use clock::{ManualClock, SystemClock};
pub use receipts::{FileReceiptSink, InMemoryReceiptSink};
pub use server::{ShutdownCoordinator, ShutdownSignal};
