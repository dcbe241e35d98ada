//! Unit of Work: one handle over every store.
//!
//! Services receive a `UnitOfWork` and reach the identity, doctor profile
//! and appointment stores through it. Multi-row writes that must be atomic
//! (doctor sign-up) run inside a database transaction owned by the store
//! that performs them.

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use super::repositories::{
    AppointmentRepository, AppointmentStore, DoctorRepository, DoctorStore, UserRepository,
    UserStore,
};

/// Unit of Work trait for dependency injection.
pub trait UnitOfWork: Send + Sync + 'static {
    fn users(&self) -> Arc<dyn UserRepository>;

    fn doctors(&self) -> Arc<dyn DoctorRepository>;

    fn appointments(&self) -> Arc<dyn AppointmentRepository>;
}

/// Concrete implementation of UnitOfWork over a SeaORM connection pool
pub struct Persistence {
    user_repo: Arc<UserStore>,
    doctor_repo: Arc<DoctorStore>,
    appointment_repo: Arc<AppointmentStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            doctor_repo: Arc::new(DoctorStore::new(db.clone())),
            appointment_repo: Arc::new(AppointmentStore::new(db)),
        }
    }
}

impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn doctors(&self) -> Arc<dyn DoctorRepository> {
        self.doctor_repo.clone()
    }

    fn appointments(&self) -> Arc<dyn AppointmentRepository> {
        self.appointment_repo.clone()
    }
}
