//! Core problem model for the multilateration solver

pub mod constants;
pub mod model;

pub use constants::*;
pub use model::RangeModel;
