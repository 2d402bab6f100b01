//! Areas module: occupancy overview and slot inspection

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
