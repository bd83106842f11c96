//! Shared types and models for the bar inventory platform
//!
//! This crate contains the domain models and the stock ledger shared between
//! the backend and the dashboard (via WASM).

pub mod ledger;
pub mod models;
pub mod types;
pub mod validation;
pub mod volume;

pub use ledger::*;
pub use models::*;
pub use types::*;
pub use validation::*;
pub use volume::*;
