//! Domain layer - Core business entities and rules
//!
//! Users and their roles, doctor profiles, appointments with their status
//! lifecycle, and the validated sign-up input. Nothing here touches storage
//! or HTTP.

pub mod appointment;
pub mod doctor;
pub mod password;
pub mod registration;
pub mod user;

pub use appointment::{
    parse_appointment_date, Appointment, AppointmentStatus, AppointmentView,
    BookAppointmentRequest, DoctorSummary, NewAppointment, PatientSummary,
};
pub use doctor::{DoctorProfile, DoctorResponse, NewDoctorProfile};
pub use password::Password;
pub use registration::{RegisterRequest, Registration, RoleRegistration};
pub use user::{AuthResponse, Identity, NewUser, PatientDetails, User, UserResponse, UserRole};
