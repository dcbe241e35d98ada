//! User service - account administration and platform statistics.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{AppointmentStatus, Identity, User, UserRole};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Headline counts for the admin dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_users: u64,
    pub total_doctors: u64,
    pub total_patients: u64,
    pub total_admins: u64,
    pub total_appointments: u64,
    pub pending_appointments: u64,
}

#[async_trait]
pub trait UserService: Send + Sync {
    async fn get_user(&self, id: Uuid) -> AppResult<User>;

    /// All accounts, oldest first
    async fn list_users(&self) -> AppResult<Vec<User>>;

    /// Remove an account along with its doctor profile and appointments.
    /// Admins cannot remove themselves.
    async fn delete_user(&self, actor: Identity, id: Uuid) -> AppResult<()>;

    async fn stats(&self) -> AppResult<AdminStats>;
}

pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.uow
            .users()
            .find_by_id(id)
            .await?
            .ok_or_not_found("User")
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        self.uow.users().list().await
    }

    async fn delete_user(&self, actor: Identity, id: Uuid) -> AppResult<()> {
        if actor.id == id {
            return Err(AppError::validation("You cannot delete your own account"));
        }

        self.uow.users().delete(id).await?;
        tracing::info!(user_id = %id, deleted_by = %actor.id, "User deleted");
        Ok(())
    }

    async fn stats(&self) -> AppResult<AdminStats> {
        let users = self.uow.users();
        let appointments = self.uow.appointments();

        let (
            total_patients,
            total_doctors,
            total_admins,
            total_appointments,
            pending_appointments,
        ) = tokio::try_join!(
            users.count_by_role(UserRole::Patient),
            users.count_by_role(UserRole::Doctor),
            users.count_by_role(UserRole::Admin),
            appointments.count(),
            appointments.count_by_status(AppointmentStatus::Pending),
        )?;

        Ok(AdminStats {
            total_users: total_patients + total_doctors + total_admins,
            total_doctors,
            total_patients,
            total_admins,
            total_appointments,
            pending_appointments,
        })
    }
}
