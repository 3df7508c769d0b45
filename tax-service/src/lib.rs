//! Reference tax service.
//!
//! Serves the wire protocol the calculator client speaks:
//!
//! | Method | Path             | Body                  | Response                         |
//! |--------|------------------|-----------------------|----------------------------------|
//! | GET    | `/`              | –                     | `{"message":"Backend is running"}` |
//! | POST   | `/calculate-tax` | `{"income": <number>}` | `{"income": <number>, "tax": <number>}` |

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde::Serialize;
use tax_core::calculations::SlabCalculator;
use tax_core::{TaxRequest, TaxResponse};
use tracing::{debug, error};

#[derive(Debug, Clone, Serialize)]
pub struct StatusMessage {
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct ServiceState {
    calculator: Arc<SlabCalculator>,
}

impl ServiceState {
    pub fn new(calculator: SlabCalculator) -> Self {
        Self {
            calculator: Arc::new(calculator),
        }
    }
}

/// Build the router with the given slab table.
pub fn router(state: ServiceState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/calculate-tax", post(calculate_tax))
        .with_state(state)
}

async fn root() -> Json<StatusMessage> {
    Json(StatusMessage {
        message: "Backend is running".to_string(),
    })
}

async fn calculate_tax(
    State(state): State<ServiceState>,
    Json(request): Json<TaxRequest>,
) -> Result<Json<TaxResponse>, (StatusCode, Json<StatusMessage>)> {
    match state.calculator.calculate(request.income) {
        Ok(tax) => {
            debug!(income = %request.income, %tax, "calculated tax");
            Ok(Json(TaxResponse {
                tax,
                income: Some(request.income),
            }))
        }
        Err(e) => {
            error!(income = %request.income, error = %e, "tax calculation failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(StatusMessage {
                    message: e.to_string(),
                }),
            ))
        }
    }
}
