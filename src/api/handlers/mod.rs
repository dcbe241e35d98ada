//! HTTP request handlers.

pub mod admin_handler;
pub mod appointment_handler;
pub mod auth_handler;
pub mod doctor_handler;

pub use admin_handler::admin_routes;
pub use appointment_handler::appointment_routes;
pub use auth_handler::auth_routes;
pub use doctor_handler::doctor_routes;
