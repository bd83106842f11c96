//! Domain models for the bar inventory platform

mod product;
mod stock;
mod transaction;
mod user;

pub use product::*;
pub use stock::*;
pub use transaction::*;
pub use user::*;
