//! Receipt sink adapters

mod file;
mod memory;

pub use file::{FileReceiptSink, DEFAULT_TITLE};
pub use memory::InMemoryReceiptSink;
