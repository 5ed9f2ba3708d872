//! Code relating to user-input units and conversions therein.

mod data;
mod time;

pub use self::data::*;
pub use self::time::*;
