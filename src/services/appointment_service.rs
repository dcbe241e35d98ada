//! Appointment service - role-aware booking, listing and status changes.
//!
//! Who may do what:
//! - patients book, see their own appointments and may cancel them
//! - doctors see and move appointments addressed to their own profile
//! - admins see and move every appointment

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    parse_appointment_date, Appointment, AppointmentStatus, AppointmentView,
    BookAppointmentRequest, DoctorProfile, DoctorSummary, Identity, NewAppointment,
    PatientSummary, User, UserRole,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[async_trait]
pub trait AppointmentService: Send + Sync {
    /// Appointments visible to the caller, earliest first.
    async fn list_mine(&self, identity: Identity) -> AppResult<Vec<AppointmentView>>;

    /// Book an appointment for the calling patient. Starts as `pending`.
    async fn book(
        &self,
        identity: Identity,
        request: BookAppointmentRequest,
    ) -> AppResult<Appointment>;

    /// Move an appointment along its lifecycle.
    async fn update_status(
        &self,
        identity: Identity,
        appointment_id: Uuid,
        status: &str,
    ) -> AppResult<Appointment>;
}

pub struct AppointmentManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> AppointmentManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn users_by_id(&self, ids: Vec<Uuid>) -> AppResult<HashMap<Uuid, User>> {
        let users = self.uow.users().find_by_ids(dedup(ids)).await?;
        Ok(users.into_iter().map(|u| (u.id, u)).collect())
    }

    /// Doctor summaries keyed by profile id.
    async fn doctor_summaries(
        &self,
        appointments: &[Appointment],
    ) -> AppResult<HashMap<Uuid, DoctorSummary>> {
        let profiles = self
            .uow
            .doctors()
            .find_by_ids(dedup(appointments.iter().map(|a| a.doctor_id).collect()))
            .await?;
        let users = self
            .users_by_id(profiles.iter().map(|p| p.user_id).collect())
            .await?;

        Ok(profiles
            .into_iter()
            .filter_map(|profile: DoctorProfile| {
                let user = users.get(&profile.user_id)?;
                Some((
                    profile.id,
                    DoctorSummary {
                        id: profile.id,
                        user_id: profile.user_id,
                        name: user.name.clone(),
                        specialization: profile.specialization,
                    },
                ))
            })
            .collect())
    }

    /// Patient summaries keyed by user id.
    async fn patient_summaries(
        &self,
        appointments: &[Appointment],
    ) -> AppResult<HashMap<Uuid, PatientSummary>> {
        let users = self
            .users_by_id(appointments.iter().map(|a| a.patient_id).collect())
            .await?;

        Ok(users
            .into_values()
            .map(|user| {
                (
                    user.id,
                    PatientSummary {
                        id: user.id,
                        name: user.name,
                        email: user.email,
                    },
                )
            })
            .collect())
    }

    /// Check that the caller may move this appointment to `next`.
    async fn authorize_status_change(
        &self,
        identity: Identity,
        appointment: &Appointment,
        next: AppointmentStatus,
    ) -> AppResult<()> {
        match identity.role {
            UserRole::Admin => Ok(()),
            UserRole::Doctor => {
                let profile = self
                    .uow
                    .doctors()
                    .find_by_user_id(identity.id)
                    .await?
                    .ok_or_not_found("Doctor profile")?;

                if profile.id == appointment.doctor_id {
                    Ok(())
                } else {
                    Err(AppError::Forbidden)
                }
            }
            UserRole::Patient => {
                if appointment.patient_id == identity.id && next == AppointmentStatus::Cancelled {
                    Ok(())
                } else {
                    Err(AppError::Forbidden)
                }
            }
        }
    }
}

fn dedup(mut ids: Vec<Uuid>) -> Vec<Uuid> {
    ids.sort_unstable();
    ids.dedup();
    ids
}

#[async_trait]
impl<U: UnitOfWork> AppointmentService for AppointmentManager<U> {
    async fn list_mine(&self, identity: Identity) -> AppResult<Vec<AppointmentView>> {
        match identity.role {
            UserRole::Patient => {
                let appointments = self.uow.appointments().list_by_patient(identity.id).await?;
                let doctors = self.doctor_summaries(&appointments).await?;

                Ok(appointments
                    .into_iter()
                    .map(|appointment| AppointmentView {
                        doctor: doctors.get(&appointment.doctor_id).cloned(),
                        patient: None,
                        appointment,
                    })
                    .collect())
            }
            UserRole::Doctor => {
                let profile = self
                    .uow
                    .doctors()
                    .find_by_user_id(identity.id)
                    .await?
                    .ok_or_not_found("Doctor profile")?;

                let appointments = self.uow.appointments().list_by_doctor(profile.id).await?;
                let patients = self.patient_summaries(&appointments).await?;

                Ok(appointments
                    .into_iter()
                    .map(|appointment| AppointmentView {
                        doctor: None,
                        patient: patients.get(&appointment.patient_id).cloned(),
                        appointment,
                    })
                    .collect())
            }
            UserRole::Admin => {
                let appointments = self.uow.appointments().list_all().await?;
                let doctors = self.doctor_summaries(&appointments).await?;
                let patients = self.patient_summaries(&appointments).await?;

                Ok(appointments
                    .into_iter()
                    .map(|appointment| AppointmentView {
                        doctor: doctors.get(&appointment.doctor_id).cloned(),
                        patient: patients.get(&appointment.patient_id).cloned(),
                        appointment,
                    })
                    .collect())
            }
        }
    }

    async fn book(
        &self,
        identity: Identity,
        request: BookAppointmentRequest,
    ) -> AppResult<Appointment> {
        if identity.role != UserRole::Patient {
            return Err(AppError::Forbidden);
        }

        let reason = request
            .reason
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());
        let date = request.date.filter(|d| !d.trim().is_empty());

        let (doctor_id, date, reason) = match (request.doctor_id, date, reason) {
            (Some(doctor_id), Some(date), Some(reason)) => (doctor_id, date, reason),
            _ => return Err(AppError::validation("Please add all fields")),
        };
        let date = parse_appointment_date(&date)?;

        self.uow
            .doctors()
            .find_by_id(doctor_id)
            .await?
            .ok_or_not_found("Doctor")?;

        let appointment = self
            .uow
            .appointments()
            .create(NewAppointment {
                patient_id: identity.id,
                doctor_id,
                date,
                reason,
            })
            .await?;

        tracing::info!(
            appointment_id = %appointment.id,
            patient_id = %identity.id,
            doctor_id = %doctor_id,
            "Appointment booked"
        );

        Ok(appointment)
    }

    async fn update_status(
        &self,
        identity: Identity,
        appointment_id: Uuid,
        status: &str,
    ) -> AppResult<Appointment> {
        let next: AppointmentStatus = status.trim().parse()?;

        let appointment = self
            .uow
            .appointments()
            .find_by_id(appointment_id)
            .await?
            .ok_or_not_found("Appointment")?;

        self.authorize_status_change(identity, &appointment, next)
            .await?;
        appointment.status.transition_to(next)?;

        let updated = self
            .uow
            .appointments()
            .update_status(appointment_id, next)
            .await?;

        tracing::info!(
            appointment_id = %appointment_id,
            from = %appointment.status,
            to = %next,
            actor = %identity.id,
            "Appointment status changed"
        );

        Ok(updated)
    }
}
