//! Doctor directory - public listing of doctor profiles.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::DoctorResponse;
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[async_trait]
pub trait DoctorService: Send + Sync {
    /// Every doctor profile joined with its user's public fields.
    async fn list_doctors(&self) -> AppResult<Vec<DoctorResponse>>;

    async fn get_doctor(&self, id: Uuid) -> AppResult<DoctorResponse>;
}

pub struct DoctorDirectory<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> DoctorDirectory<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> DoctorService for DoctorDirectory<U> {
    async fn list_doctors(&self) -> AppResult<Vec<DoctorResponse>> {
        let profiles = self.uow.doctors().list().await?;
        let users: HashMap<_, _> = self
            .uow
            .users()
            .find_by_ids(profiles.iter().map(|p| p.user_id).collect())
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        // A profile whose user vanished mid-request is skipped
        Ok(profiles
            .into_iter()
            .filter_map(|profile| {
                let user = users.get(&profile.user_id)?;
                Some(DoctorResponse::new(profile, user))
            })
            .collect())
    }

    async fn get_doctor(&self, id: Uuid) -> AppResult<DoctorResponse> {
        let profile = self
            .uow
            .doctors()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Doctor")?;

        let user = self
            .uow
            .users()
            .find_by_id(profile.user_id)
            .await?
            .ok_or_not_found("Doctor")?;

        Ok(DoctorResponse::new(profile, &user))
    }
}
