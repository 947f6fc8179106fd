//! Core business logic for tandem.

pub mod history;
pub mod services;

pub use services::*;
