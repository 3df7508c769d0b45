//! Slab-rate income tax.
//!
//! | Slab | Income                    | Tax                                   |
//! |------|---------------------------|---------------------------------------|
//! | 1    | up to 2,50,000            | nil                                   |
//! | 2    | 2,50,000 to 5,00,000      | 5% of income above 2,50,000           |
//! | 3    | 5,00,000 to 10,00,000     | 12,500 + 20% of income above 5,00,000 |
//! | 4    | above 10,00,000           | 1,12,500 + 30% of income above 10,00,000 |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::calculations::{SlabCalculator, default_slabs};
//!
//! let calculator = SlabCalculator::new(default_slabs()).unwrap();
//! assert_eq!(calculator.calculate(dec!(600000)).unwrap(), dec!(32500.00));
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use thiserror::Error;

use crate::TaxBracket;
use crate::calculations::common::{max, round_half_up};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlabError {
    #[error("no tax slabs provided")]
    NoSlabs,

    #[error("no tax slab found for income {0}")]
    NoMatchingSlab(Decimal),
}

/// The slab table served by the reference tax service.
pub fn default_slabs() -> Vec<TaxBracket> {
    vec![
        TaxBracket {
            min_income: dec!(0),
            max_income: Some(dec!(250000)),
            tax_rate: dec!(0),
            base_tax: dec!(0),
        },
        TaxBracket {
            min_income: dec!(250000),
            max_income: Some(dec!(500000)),
            tax_rate: dec!(0.05),
            base_tax: dec!(0),
        },
        TaxBracket {
            min_income: dec!(500000),
            max_income: Some(dec!(1000000)),
            tax_rate: dec!(0.20),
            base_tax: dec!(12500),
        },
        TaxBracket {
            min_income: dec!(1000000),
            max_income: None,
            tax_rate: dec!(0.30),
            base_tax: dec!(112500),
        },
    ]
}

/// Computes tax from a sorted table of [`TaxBracket`] slabs.
#[derive(Debug, Clone)]
pub struct SlabCalculator {
    slabs: Vec<TaxBracket>,
}

impl SlabCalculator {
    /// Slabs must be sorted by `min_income` and the last one should be
    /// unbounded so every positive income has a match.
    pub fn new(slabs: Vec<TaxBracket>) -> Result<Self, SlabError> {
        if slabs.is_empty() {
            return Err(SlabError::NoSlabs);
        }
        Ok(Self { slabs })
    }

    pub fn slabs(&self) -> &[TaxBracket] {
        &self.slabs
    }

    /// Tax owed on `income`, rounded half-up to cents. Zero or negative
    /// income owes nothing.
    pub fn calculate(
        &self,
        income: Decimal,
    ) -> Result<Decimal, SlabError> {
        let income = max(income, Decimal::ZERO);
        if income.is_zero() {
            return Ok(Decimal::ZERO);
        }

        let slab = self
            .slabs
            .iter()
            .find(|s| s.contains(income))
            .ok_or(SlabError::NoMatchingSlab(income))?;

        let marginal_income = income - slab.min_income;
        Ok(round_half_up(slab.base_tax + marginal_income * slab.tax_rate))
    }
}

impl Default for SlabCalculator {
    fn default() -> Self {
        Self {
            slabs: default_slabs(),
        }
    }
}
