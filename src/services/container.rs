//! Service Container - Centralized service access.
//!
//! Handlers reach every use case through one container so the router can
//! be built over real stores or test doubles alike.

use std::sync::Arc;

use super::{
    AppointmentManager, AppointmentService, AuthService, Authenticator, DoctorDirectory,
    DoctorService, UserManager, UserService,
};
use crate::config::Config;
use crate::infra::{Persistence, UnitOfWork};

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn appointments(&self) -> Arc<dyn AppointmentService>;

    fn doctors(&self) -> Arc<dyn DoctorService>;

    fn users(&self) -> Arc<dyn UserService>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    appointment_service: Arc<dyn AppointmentService>,
    doctor_service: Arc<dyn DoctorService>,
    user_service: Arc<dyn UserService>,
}

impl Services {
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        appointment_service: Arc<dyn AppointmentService>,
        doctor_service: Arc<dyn DoctorService>,
        user_service: Arc<dyn UserService>,
    ) -> Self {
        Self {
            auth_service,
            appointment_service,
            doctor_service,
            user_service,
        }
    }

    /// Create service container from database connection and config
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        Self::from_unit_of_work(Arc::new(Persistence::new(db)), config)
    }

    /// Wire every service over one Unit of Work.
    pub fn from_unit_of_work<U: UnitOfWork>(uow: Arc<U>, config: Config) -> Self {
        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), config)),
            appointment_service: Arc::new(AppointmentManager::new(uow.clone())),
            doctor_service: Arc::new(DoctorDirectory::new(uow.clone())),
            user_service: Arc::new(UserManager::new(uow)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn appointments(&self) -> Arc<dyn AppointmentService> {
        self.appointment_service.clone()
    }

    fn doctors(&self) -> Arc<dyn DoctorService> {
        self.doctor_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }
}
