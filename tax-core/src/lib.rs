pub mod calculations;
pub mod models;
pub mod service;

pub use models::*;
pub use service::{CalculationError, ServiceConfig, TaxCalculator};
