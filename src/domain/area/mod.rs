//! Area aggregate
//!
//! Fixed-size slot arrays per area code and the only mutators of slot state.

pub mod model;

pub use model::{Area, AreaSpec, AreaTable};
