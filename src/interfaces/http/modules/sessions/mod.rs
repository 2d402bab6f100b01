//! Sessions module: vehicle entry, exit and lookup

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
