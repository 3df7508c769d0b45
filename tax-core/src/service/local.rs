use async_trait::async_trait;
use rust_decimal::Decimal;

use super::calculator::{CalculationError, TaxCalculator};
use super::factory::{CalculatorFactory, ServiceConfig};
use crate::calculations::SlabCalculator;
use crate::models::TaxResponse;

/// Computes tax in-process with the slab table instead of calling a service.
#[derive(Debug, Clone, Default)]
pub struct LocalTaxCalculator {
    slabs: SlabCalculator,
}

impl LocalTaxCalculator {
    pub fn new(slabs: SlabCalculator) -> Self {
        Self { slabs }
    }
}

#[async_trait]
impl TaxCalculator for LocalTaxCalculator {
    async fn calculate(&self, income: Decimal) -> Result<TaxResponse, CalculationError> {
        let tax = self
            .slabs
            .calculate(income)
            .map_err(|e| CalculationError::NoApplicableSlab(e.to_string()))?;

        tracing::debug!(%income, %tax, "computed tax locally");
        Ok(TaxResponse {
            tax,
            income: Some(income),
        })
    }
}

/// [`CalculatorFactory`] for the offline `"local"` backend.
pub struct LocalCalculatorFactory;

#[async_trait]
impl CalculatorFactory for LocalCalculatorFactory {
    fn backend_name(&self) -> &'static str {
        "local"
    }

    async fn create(
        &self,
        _config: &ServiceConfig,
    ) -> Result<Box<dyn TaxCalculator>, CalculationError> {
        Ok(Box::new(LocalTaxCalculator::default()))
    }
}
