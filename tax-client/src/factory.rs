use async_trait::async_trait;
use tax_core::service::{CalculationError, CalculatorFactory, ServiceConfig, TaxCalculator};

use crate::client::HttpTaxCalculator;

/// [`CalculatorFactory`] for the `"http"` backend.
///
/// ```rust
/// use tax_client::HttpCalculatorFactory;
/// use tax_core::service::CalculatorRegistry;
///
/// let mut registry = CalculatorRegistry::new();
/// registry.register(Box::new(HttpCalculatorFactory));
/// assert_eq!(registry.available_backends(), vec!["http"]);
/// ```
pub struct HttpCalculatorFactory;

#[async_trait]
impl CalculatorFactory for HttpCalculatorFactory {
    fn backend_name(&self) -> &'static str {
        "http"
    }

    /// Builds a client for `config.endpoint`. No connection is opened until
    /// the first calculation.
    async fn create(
        &self,
        config: &ServiceConfig,
    ) -> Result<Box<dyn TaxCalculator>, CalculationError> {
        Ok(Box::new(HttpTaxCalculator::from_config(config)?))
    }
}
