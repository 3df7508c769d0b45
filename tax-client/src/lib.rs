//! HTTP backend for [`tax_core::TaxCalculator`].
//!
//! Talks to a tax service over `POST /calculate-tax` with a JSON body of
//! `{"income": <number>}` and expects `{"tax": <number>, ...}` back.

mod client;
mod factory;

pub use client::HttpTaxCalculator;
pub use factory::HttpCalculatorFactory;
