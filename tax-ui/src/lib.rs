pub mod app;
pub mod config;
pub mod controller;
pub mod logging;
pub mod render;
pub mod state;

pub use controller::{FormController, FormError};
pub use state::{FormState, SubmissionPhase};
