use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::TaxResponse;

/// Message shown for every non-success response from the tax service.
pub const CALCULATION_FAILED: &str = "Error calculating tax";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CalculationError {
    /// The service answered with a non-2xx status. The status and body are
    /// kept for diagnostics but never shown.
    #[error("Error calculating tax")]
    Status { status: u16, body: String },

    /// The request never produced a response (DNS, refused connection,
    /// timeout). Carries the transport's own description.
    #[error("{0}")]
    Transport(String),

    /// A 2xx response whose body is not `{"tax": <number>, ...}`.
    #[error("invalid response from tax service: {0}")]
    InvalidResponse(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    /// The request body could not be encoded.
    #[error("cannot encode tax request: {0}")]
    Encoding(String),

    /// The slab table has no slab covering the income.
    #[error("tax slabs do not cover this income: {0}")]
    NoApplicableSlab(String),
}

impl CalculationError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// One round trip: income in, computed tax out.
#[async_trait]
pub trait TaxCalculator: Send + Sync {
    async fn calculate(&self, income: Decimal) -> Result<TaxResponse, CalculationError>;
}
