//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Cache, Database};
use crate::services::{
    AppointmentService, AuthService, DoctorService, ServiceContainer, Services, UserService,
};

/// Application state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub appointment_service: Arc<dyn AppointmentService>,
    pub doctor_service: Arc<dyn DoctorService>,
    pub user_service: Arc<dyn UserService>,
    /// Redis, present only when rate limiting is configured
    pub cache: Option<Arc<Cache>>,
    /// Database handle for health checks
    pub database: Option<Arc<Database>>,
}

impl AppState {
    /// Wire services over the database and attach infrastructure handles.
    pub fn from_config(database: Arc<Database>, cache: Option<Arc<Cache>>, config: Config) -> Self {
        let services = Services::from_connection(database.get_connection(), config);

        Self {
            database: Some(database),
            cache,
            ..Self::from_services(&services)
        }
    }

    /// State over an existing container, without database or Redis handles.
    pub fn from_services(services: &dyn ServiceContainer) -> Self {
        Self {
            auth_service: services.auth(),
            appointment_service: services.appointments(),
            doctor_service: services.doctors(),
            user_service: services.users(),
            cache: None,
            database: None,
        }
    }
}
