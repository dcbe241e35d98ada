//! Doctor profile store.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use uuid::Uuid;

use super::entities::doctor::{self, ActiveModel, Entity as DoctorEntity};
use super::user_repository::new_user_model;
use crate::domain::{DoctorProfile, NewDoctorProfile, NewUser, User};
use crate::errors::{AppError, AppResult};

#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait DoctorRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<DoctorProfile>>;

    async fn find_by_user_id(&self, user_id: Uuid) -> AppResult<Option<DoctorProfile>>;

    async fn find_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<DoctorProfile>>;

    /// All profiles, oldest first
    async fn list(&self) -> AppResult<Vec<DoctorProfile>>;

    /// Insert a doctor's user row and profile atomically.
    ///
    /// Neither record exists afterwards if either insert fails.
    async fn create_with_user(
        &self,
        user: NewUser,
        profile: NewDoctorProfile,
    ) -> AppResult<(User, DoctorProfile)>;
}

/// SeaORM-backed doctor profile store
pub struct DoctorStore {
    db: DatabaseConnection,
}

impl DoctorStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DoctorRepository for DoctorStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<DoctorProfile>> {
        let result = DoctorEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(DoctorProfile::from))
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> AppResult<Option<DoctorProfile>> {
        let result = DoctorEntity::find()
            .filter(doctor::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?;

        Ok(result.map(DoctorProfile::from))
    }

    async fn find_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<DoctorProfile>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = DoctorEntity::find()
            .filter(doctor::Column::Id.is_in(ids))
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(DoctorProfile::from).collect())
    }

    async fn list(&self) -> AppResult<Vec<DoctorProfile>> {
        let models = DoctorEntity::find()
            .order_by_asc(doctor::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(DoctorProfile::from).collect())
    }

    async fn create_with_user(
        &self,
        user: NewUser,
        profile: NewDoctorProfile,
    ) -> AppResult<(User, DoctorProfile)> {
        let txn = self.db.begin().await?;

        let user_model = match new_user_model(user).insert(&txn).await {
            Ok(model) => model,
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                return Err(AppError::from_insert(e, "User"));
            }
        };

        let profile_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_model.id),
            specialization: Set(profile.specialization),
            experience: Set(profile.experience),
            fees_per_consultation: Set(profile.fees_per_consultation),
            department: Set(profile.department),
            bio: Set(profile.bio),
            created_at: Set(chrono::Utc::now()),
        };

        let profile_model = match profile_model.insert(&txn).await {
            Ok(model) => model,
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                return Err(AppError::from_insert(e, "Doctor profile"));
            }
        };

        txn.commit().await?;

        Ok((User::from(user_model), DoctorProfile::from(profile_model)))
    }
}
