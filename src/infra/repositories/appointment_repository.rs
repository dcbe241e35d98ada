//! Appointment store.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::appointment::{self, ActiveModel, Entity as AppointmentEntity};
use crate::domain::{Appointment, AppointmentStatus, NewAppointment};
use crate::errors::{AppError, AppResult};

#[cfg(test)]
use mockall::automock;

/// List queries return appointments ordered by date, earliest first.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Appointment>>;

    /// Insert with status `pending`.
    async fn create(&self, appointment: NewAppointment) -> AppResult<Appointment>;

    /// Overwrite the status. Last write wins.
    async fn update_status(&self, id: Uuid, status: AppointmentStatus) -> AppResult<Appointment>;

    async fn list_by_patient(&self, patient_id: Uuid) -> AppResult<Vec<Appointment>>;

    async fn list_by_doctor(&self, doctor_id: Uuid) -> AppResult<Vec<Appointment>>;

    async fn list_all(&self) -> AppResult<Vec<Appointment>>;

    async fn count(&self) -> AppResult<u64>;

    async fn count_by_status(&self, status: AppointmentStatus) -> AppResult<u64>;
}

/// SeaORM-backed appointment store
pub struct AppointmentStore {
    db: DatabaseConnection,
}

impl AppointmentStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AppointmentRepository for AppointmentStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Appointment>> {
        let result = AppointmentEntity::find_by_id(id).one(&self.db).await?;
        result.map(Appointment::try_from).transpose()
    }

    async fn create(&self, appointment: NewAppointment) -> AppResult<Appointment> {
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            patient_id: Set(appointment.patient_id),
            doctor_id: Set(appointment.doctor_id),
            date: Set(appointment.date),
            status: Set(AppointmentStatus::Pending.to_string()),
            reason: Set(appointment.reason),
            created_at: Set(chrono::Utc::now()),
        };

        let model = active_model.insert(&self.db).await?;
        Appointment::try_from(model)
    }

    async fn update_status(&self, id: Uuid, status: AppointmentStatus) -> AppResult<Appointment> {
        let existing = AppointmentEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("Appointment"))?;

        let mut active: ActiveModel = existing.into();
        active.status = Set(status.to_string());

        let model = active.update(&self.db).await?;
        Appointment::try_from(model)
    }

    async fn list_by_patient(&self, patient_id: Uuid) -> AppResult<Vec<Appointment>> {
        let models = AppointmentEntity::find()
            .filter(appointment::Column::PatientId.eq(patient_id))
            .order_by_asc(appointment::Column::Date)
            .all(&self.db)
            .await?;

        models.into_iter().map(Appointment::try_from).collect()
    }

    async fn list_by_doctor(&self, doctor_id: Uuid) -> AppResult<Vec<Appointment>> {
        let models = AppointmentEntity::find()
            .filter(appointment::Column::DoctorId.eq(doctor_id))
            .order_by_asc(appointment::Column::Date)
            .all(&self.db)
            .await?;

        models.into_iter().map(Appointment::try_from).collect()
    }

    async fn list_all(&self) -> AppResult<Vec<Appointment>> {
        let models = AppointmentEntity::find()
            .order_by_asc(appointment::Column::Date)
            .all(&self.db)
            .await?;

        models.into_iter().map(Appointment::try_from).collect()
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(AppointmentEntity::find().count(&self.db).await?)
    }

    async fn count_by_status(&self, status: AppointmentStatus) -> AppResult<u64> {
        let count = AppointmentEntity::find()
            .filter(appointment::Column::Status.eq(status.as_str()))
            .count(&self.db)
            .await?;

        Ok(count)
    }
}
