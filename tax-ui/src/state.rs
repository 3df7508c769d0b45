//! Form state for the tax calculator.
//!
//! Holds the raw income text and the outcome of the latest submission. The
//! tax result and the request error are variants of one enum, so at most one
//! of them is ever present.

use rust_decimal::Decimal;

/// Where the current submission cycle stands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionPhase {
    /// Nothing submitted yet.
    #[default]
    Idle,
    /// A request is in flight.
    Pending,
    /// The last round trip produced a tax value.
    Succeeded(Decimal),
    /// The last round trip failed with a user-facing message.
    Failed(String),
}

#[derive(Debug, Clone, Default)]
pub struct FormState {
    income: String,
    phase: SubmissionPhase,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw income text exactly as entered.
    pub fn income(&self) -> &str {
        &self.income
    }

    /// Store the raw input verbatim. No validation happens here.
    pub fn set_income(&mut self, raw: impl Into<String>) {
        self.income = raw.into();
    }

    pub fn phase(&self) -> &SubmissionPhase {
        &self.phase
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.phase, SubmissionPhase::Pending)
    }

    pub fn tax_result(&self) -> Option<Decimal> {
        match self.phase {
            SubmissionPhase::Succeeded(tax) => Some(tax),
            _ => None,
        }
    }

    pub fn request_error(&self) -> Option<&str> {
        match &self.phase {
            SubmissionPhase::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Clear the previous result and error and mark a request in flight.
    pub fn start_submission(&mut self) {
        self.phase = SubmissionPhase::Pending;
    }

    /// Leave `Pending` without an outcome. Other phases are kept.
    pub fn cancel_submission(&mut self) {
        if self.is_pending() {
            self.phase = SubmissionPhase::Idle;
        }
    }

    pub fn set_tax_result(&mut self, tax: Decimal) {
        self.phase = SubmissionPhase::Succeeded(tax);
    }

    pub fn set_request_error(&mut self, message: impl Into<String>) {
        self.phase = SubmissionPhase::Failed(message.into());
    }
}
