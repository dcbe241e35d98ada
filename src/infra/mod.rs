//! Infrastructure layer - External systems integration
//!
//! - Database connection, migrations and repositories
//! - Redis (rate limiting only)
//! - Unit of Work giving services access to every store

pub mod cache;
pub mod db;
pub mod repositories;
pub mod unit_of_work;

pub use cache::Cache;
pub use db::{Database, Migrator};
pub use repositories::{
    AppointmentRepository, AppointmentStore, DoctorRepository, DoctorStore, UserRepository,
    UserStore,
};
pub use unit_of_work::{Persistence, UnitOfWork};

#[cfg(test)]
pub use repositories::{MockAppointmentRepository, MockDoctorRepository, MockUserRepository};
