use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of a progressive rate schedule.
///
/// Income above `min_income` and up to `max_income` (unbounded when `None`)
/// is taxed as `base_tax + (income - min_income) * tax_rate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub min_income: Decimal,
    pub max_income: Option<Decimal>,
    pub tax_rate: Decimal,
    pub base_tax: Decimal,
}

impl TaxBracket {
    /// Returns `true` if `income` falls inside this bracket.
    pub fn contains(&self, income: Decimal) -> bool {
        income > self.min_income && self.max_income.is_none_or(|max| income <= max)
    }
}
