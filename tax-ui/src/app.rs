//! Wiring between the terminal, the form controller and the calculator
//! backends.

use std::io::Write;

use anyhow::Result;
use tax_client::HttpCalculatorFactory;
use tax_core::service::{CalculatorRegistry, LocalCalculatorFactory};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};

use crate::controller::FormController;
use crate::render::{render_outcome, render_refusal};

pub const PROMPT: &str = "Enter your income: ";

/// Registry with every backend this binary knows about.
pub fn build_registry() -> CalculatorRegistry {
    let mut registry = CalculatorRegistry::new();
    registry.register(Box::new(HttpCalculatorFactory));
    registry.register(Box::new(LocalCalculatorFactory));
    registry
}

/// Treat `raw` as the new field contents, submit, and print the outcome.
///
/// Returns `true` when this submission produced a tax value.
pub async fn submit_and_render<W: Write>(
    controller: &mut FormController,
    raw: &str,
    out: &mut W,
    ansi: bool,
) -> Result<bool> {
    controller.on_input_change(raw);

    match controller.submit().await {
        Ok(()) => {
            if let Some(line) = render_outcome(controller.state(), ansi) {
                writeln!(out, "{line}")?;
            }
            Ok(controller.state().tax_result().is_some())
        }
        Err(refusal) => {
            warn!(error = %refusal, "submission refused");
            writeln!(out, "{}", render_refusal(&refusal, ansi))?;
            Ok(false)
        }
    }
}

/// Prompt loop: every line read is one input change plus submit.
/// Ends on `quit`, `exit`, or end of input.
pub async fn run_interactive<R, W>(
    controller: &mut FormController,
    input: R,
    out: &mut W,
    ansi: bool,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();

    write!(out, "{PROMPT}")?;
    out.flush()?;
    while let Some(line) = lines.next_line().await? {
        if matches!(line.trim(), "quit" | "exit") {
            debug!("leaving interactive mode");
            break;
        }

        submit_and_render(controller, &line, out, ansi).await?;
        write!(out, "{PROMPT}")?;
        out.flush()?;
    }
    writeln!(out)?;
    Ok(())
}
