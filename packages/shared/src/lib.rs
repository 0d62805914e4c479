//! Utilities shared across the Tsudoi packages.

pub mod logger;
pub mod time;
