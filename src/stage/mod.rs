//! The animation driver: owned stage state, flight lifecycle, dot sampling.

pub mod driver;
pub mod flight;
