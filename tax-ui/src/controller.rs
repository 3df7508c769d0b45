//! Input form controller.
//!
//! Drives one submission cycle: validate the raw income, call the
//! [`TaxCalculator`] once, and record exactly one outcome in [`FormState`].

use std::sync::Arc;

use rust_decimal::Decimal;
use tax_core::{CalculationError, IncomeParseError, TaxCalculator, TaxResponse, parse_income};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::state::FormState;

/// Reasons a submission is refused before any request is sent.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("Please enter your income")]
    Required,

    #[error("Income must be a number (got '{0}')")]
    InvalidIncome(String),

    #[error("Income is outside the supported range (got '{0}')")]
    IncomeOutOfRange(String),

    #[error("A calculation is already in progress")]
    AlreadyPending,
}

impl From<IncomeParseError> for FormError {
    fn from(e: IncomeParseError) -> Self {
        match e {
            IncomeParseError::Empty => Self::Required,
            IncomeParseError::Invalid { input, .. } => Self::InvalidIncome(input),
            IncomeParseError::OutOfRange { input } => Self::IncomeOutOfRange(input),
        }
    }
}

pub struct FormController {
    state: FormState,
    calculator: Arc<dyn TaxCalculator>,
}

impl FormController {
    pub fn new(calculator: Arc<dyn TaxCalculator>) -> Self {
        Self {
            state: FormState::new(),
            calculator,
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn calculator(&self) -> Arc<dyn TaxCalculator> {
        Arc::clone(&self.calculator)
    }

    pub fn on_input_change(&mut self, raw: impl Into<String>) {
        self.state.set_income(raw);
    }

    /// First half of a submission.
    ///
    /// Refuses while a request is pending or when the income does not parse;
    /// a refusal leaves the state untouched. Otherwise clears the previous
    /// outcome, enters `Pending` and returns the income to send.
    pub fn begin_submit(&mut self) -> Result<Decimal, FormError> {
        if self.state.is_pending() {
            return Err(FormError::AlreadyPending);
        }

        let income = parse_income(self.state.income())?;
        self.state.start_submission();
        debug!(%income, "submission started");
        Ok(income)
    }

    /// Second half of a submission: record the calculator's outcome.
    ///
    /// Outcomes arriving while no submission is pending are dropped.
    pub fn complete_submit(&mut self, outcome: Result<TaxResponse, CalculationError>) {
        if !self.state.is_pending() {
            warn!("dropping calculation outcome with no pending submission");
            return;
        }

        match outcome {
            Ok(response) => {
                info!(tax = %response.tax, "tax calculated");
                self.state.set_tax_result(response.tax);
            }
            Err(e) => {
                warn!(error = ?e, "tax calculation failed");
                self.state.set_request_error(e.to_string());
            }
        }
    }

    /// Give up on the pending submission without recording an outcome.
    ///
    /// Callers driving [`begin_submit`](Self::begin_submit) and
    /// [`complete_submit`](Self::complete_submit) themselves must call this
    /// when they drop the request, or every later submission is refused.
    pub fn abandon_submit(&mut self) {
        if self.state.is_pending() {
            debug!("submission abandoned");
            self.state.cancel_submission();
        }
    }

    /// Run a full submission: validate, call the calculator once, record the
    /// outcome.
    ///
    /// Dropping the returned future mid-request (a timeout, `select!`)
    /// abandons the submission.
    pub async fn submit(&mut self) -> Result<(), FormError> {
        let income = self.begin_submit()?;
        let calculator = Arc::clone(&self.calculator);
        let pending = PendingSubmission {
            controller: self,
            settled: false,
        };
        let outcome = calculator.calculate(income).await;
        pending.settle(outcome);
        Ok(())
    }
}

/// Abandons the submission on drop unless an outcome was recorded.
struct PendingSubmission<'a> {
    controller: &'a mut FormController,
    settled: bool,
}

impl PendingSubmission<'_> {
    fn settle(mut self, outcome: Result<TaxResponse, CalculationError>) {
        self.controller.complete_submit(outcome);
        self.settled = true;
    }
}

impl Drop for PendingSubmission<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.controller.abandon_submit();
        }
    }
}
