//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod appointment;
pub mod doctor;
pub mod user;

#[allow(unused_imports)]
pub use appointment::{ActiveModel as AppointmentActiveModel, Entity as AppointmentEntity};
#[allow(unused_imports)]
pub use doctor::{ActiveModel as DoctorActiveModel, Entity as DoctorEntity};
#[allow(unused_imports)]
pub use user::{ActiveModel as UserActiveModel, Entity as UserEntity};
