//! Identity store: user records and their credentials.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::{NewUser, User, UserRole};
use crate::errors::{AppError, AppResult};

#[cfg(test)]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Emails are stored lowercase; callers pass a normalised address.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Load several users at once; missing ids are skipped.
    async fn find_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<User>>;

    /// Insert a user. A duplicate email yields `AppError::Conflict`.
    async fn create(&self, user: NewUser) -> AppResult<User>;

    /// All users, oldest first
    async fn list(&self) -> AppResult<Vec<User>>;

    /// Delete a user together with their doctor profile and appointments.
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    async fn count_by_role(&self, role: UserRole) -> AppResult<u64>;
}

/// Build the active model for a fresh user row.
pub(crate) fn new_user_model(user: NewUser) -> ActiveModel {
    let now = chrono::Utc::now();
    ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(user.name),
        email: Set(user.email),
        password_hash: Set(user.password_hash),
        role: Set(user.role.to_string()),
        age: Set(user.details.age),
        gender: Set(user.details.gender),
        phone: Set(user.details.phone),
        address: Set(user.details.address),
        blood_group: Set(user.details.blood_group),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

/// SeaORM-backed identity store
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;

        Ok(result.map(User::from))
    }

    async fn find_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = UserEntity::find()
            .filter(user::Column::Id.is_in(ids))
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(User::from).collect())
    }

    async fn create(&self, user: NewUser) -> AppResult<User> {
        let model = new_user_model(user)
            .insert(&self.db)
            .await
            .map_err(|e| AppError::from_insert(e, "User"))?;

        Ok(User::from(model))
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let models = UserEntity::find()
            .order_by_asc(user::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(User::from).collect())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        // Doctor profile and appointments go with it (ON DELETE CASCADE)
        let result = UserEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("User"));
        }

        Ok(())
    }

    async fn count_by_role(&self, role: UserRole) -> AppResult<u64> {
        let count = UserEntity::find()
            .filter(user::Column::Role.eq(role.as_str()))
            .count(&self.db)
            .await?;

        Ok(count)
    }
}
