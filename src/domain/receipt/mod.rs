pub mod model;

pub use model::Receipt;
