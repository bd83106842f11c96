//! Business logic services for the bar inventory platform

pub mod active_users;
pub mod auth;
pub mod inventory;
pub mod products;
pub mod reporting;
pub mod users;

pub use active_users::ActiveUsers;
pub use auth::AuthService;
pub use inventory::InventoryService;
pub use products::ProductService;
pub use reporting::ReportingService;
pub use users::UserService;
