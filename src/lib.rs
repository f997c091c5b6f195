//! Client for the public-works tender service: narrows tenders by postal
//! code, area and local area, pages through results and orders clash reports
//! by priority.

pub mod app;
pub mod clash;
pub mod common;
pub mod config;
pub mod display;
pub mod infra;
pub mod observability;
pub mod query;

#[cfg(test)]
pub(crate) mod test_support;

pub use app::{TenderDashboard, TenderServicePort};
pub use common::error::{Result, TenderError};
