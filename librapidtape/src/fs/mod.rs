//! Platform selection for opening tape devices.
//!
//! Which opener a build uses is fixed here by `cfg`, not discovered at
//! runtime.

pub mod portable;

#[cfg(unix)]
pub mod unix;

#[cfg(unix)]
pub use crate::fs::unix::*;

#[cfg(not(unix))]
pub use crate::fs::portable::*;
