mod income;
pub mod json_number;
mod tax_bracket;
mod tax_exchange;

pub use income::{IncomeParseError, parse_income};
pub use tax_bracket::TaxBracket;
pub use tax_exchange::{TaxRequest, TaxResponse};
