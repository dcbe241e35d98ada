//! MediBook - appointment booking backend.
//!
//! Patients book appointments with doctors, doctors approve and complete
//! them, administrators manage accounts. Everything is served as a JSON
//! REST API behind bearer-token sessions.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Users, doctor profiles, appointments and their rules
//! - **services**: Use cases (auth, booking, directory, administration)
//! - **infra**: Postgres stores, migrations, Redis rate-limit counters
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared response types
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::{create_router, AppState};
pub use config::Config;
pub use domain::{Appointment, AppointmentStatus, User, UserRole};
pub use errors::{AppError, AppResult};
