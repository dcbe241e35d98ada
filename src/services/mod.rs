//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain rules and the stores behind a Unit of Work.
//! Handlers depend on the traits only.

mod appointment_service;
mod auth_service;
pub mod container;
mod doctor_service;
mod user_service;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use appointment_service::{AppointmentManager, AppointmentService};
pub use auth_service::{AuthService, Authenticator, Claims};
pub use doctor_service::{DoctorDirectory, DoctorService};
pub use user_service::{AdminStats, UserManager, UserService};
