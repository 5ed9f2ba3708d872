extern crate num_traits;
extern crate thiserror;
extern crate tracing;

pub mod error;
pub mod tape;
pub mod blocking;
pub mod copier;
pub mod fs;

pub mod tuning;
pub mod units;

pub use crate::error::TapeError;
