//! HTTP request handlers

pub mod admin;
pub mod auth;
pub mod health;
pub mod inventory;
pub mod products;
pub mod reporting;

pub use admin::*;
pub use auth::*;
pub use health::*;
pub use inventory::*;
pub use products::*;
pub use reporting::*;
