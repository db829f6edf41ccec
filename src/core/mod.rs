//! Shared constants, tuning and error types.

pub mod config;
pub mod constants;
pub mod error;

pub use config::*;
pub use error::*;
