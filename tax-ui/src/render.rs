//! Terminal rendering of the form outcome.

use crate::controller::FormError;
use crate::state::{FormState, SubmissionPhase};

const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

fn paint(text: &str, color: &str, ansi: bool) -> String {
    if ansi {
        format!("{color}{text}{RESET}")
    } else {
        text.to_string()
    }
}

/// The line to show for the current state, if any.
///
/// A tax result renders as `Tax: <value>` without trailing zeros; a request
/// error renders in red when `ansi` is set.
pub fn render_outcome(
    state: &FormState,
    ansi: bool,
) -> Option<String> {
    match state.phase() {
        SubmissionPhase::Idle => None,
        SubmissionPhase::Pending => Some("Calculating...".to_string()),
        SubmissionPhase::Succeeded(tax) => Some(format!("Tax: {}", tax.normalize())),
        SubmissionPhase::Failed(message) => Some(paint(message, RED, ansi)),
    }
}

/// A refused submission, shown as a warning.
pub fn render_refusal(
    error: &FormError,
    ansi: bool,
) -> String {
    paint(&error.to_string(), YELLOW, ansi)
}
