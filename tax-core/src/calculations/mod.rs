//! Income tax calculations.
//!
//! The rate schedule lives in [`slab`]; [`common`] holds the rounding helpers
//! shared by every calculation.

pub mod common;
pub mod slab;

pub use slab::{SlabCalculator, SlabError, default_slabs};
