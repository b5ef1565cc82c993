//! Price calculator

pub mod model;

pub use model::{calculate_price, PackageMeasure, PriceBreakdown};
