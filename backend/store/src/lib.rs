//! # Flock Store
//!
//! SQLite persistence for the Flock crowdfunding model. Records come back as
//! [`flock_core`] types; derived figures (donation total, funding
//! percentage, available rewards, current project) are exposed as explicit
//! query functions in [`db`].

pub mod config;
pub mod db;
pub mod errors;
pub mod records;
pub mod report;

pub use errors::{Result, StoreError};
