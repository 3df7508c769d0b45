pub mod calculator;
pub mod factory;
pub mod local;

pub use calculator::{CALCULATION_FAILED, CalculationError, TaxCalculator};
pub use factory::{
    CalculatorFactory, CalculatorRegistry, DEFAULT_ENDPOINT, ServiceConfig,
};
pub use local::{LocalCalculatorFactory, LocalTaxCalculator};
