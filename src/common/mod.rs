// Shared types, constants and the crate error

pub mod constants;
pub mod error;
pub mod types;

pub use error::{Result, TenderError};
