//! Repository layer - Data access abstraction
//!
//! One repository per store (identity, doctor profiles, appointments).
//! Services only see the traits.

mod appointment_repository;
mod doctor_repository;
pub(crate) mod entities;
mod user_repository;

pub use appointment_repository::{AppointmentRepository, AppointmentStore};
pub use doctor_repository::{DoctorRepository, DoctorStore};
pub use user_repository::{UserRepository, UserStore};

#[cfg(test)]
pub use appointment_repository::MockAppointmentRepository;
#[cfg(test)]
pub use doctor_repository::MockDoctorRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
