//! Shared test harness: in-memory stores behind the real services and router.
//!
//! The stores mirror the Postgres schema rules the services rely on: unique
//! emails, one profile per doctor, and cascading deletes.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use medibook::api::{create_router, AppState};
use medibook::config::Config;
use medibook::domain::{
    Appointment, AppointmentStatus, DoctorProfile, NewAppointment, NewDoctorProfile, NewUser,
    User, UserRole,
};
use medibook::errors::{AppError, AppResult};
use medibook::infra::{AppointmentRepository, DoctorRepository, UnitOfWork, UserRepository};
use medibook::services::Services;

pub const TEST_SECRET: &str = "test-secret-key-for-testing-only-32chars";

pub fn test_config() -> Config {
    Config::new("postgres://localhost/medibook_test", TEST_SECRET)
}

#[derive(Default)]
pub struct Tables {
    pub users: Vec<User>,
    pub doctors: Vec<DoctorProfile>,
    pub appointments: Vec<Appointment>,
}

type Shared = Arc<Mutex<Tables>>;

pub struct MemoryUsers(Shared);
pub struct MemoryDoctors(Shared);
pub struct MemoryAppointments(Shared);

fn insert_user(tables: &mut Tables, user: NewUser) -> AppResult<User> {
    if tables.users.iter().any(|u| u.email == user.email) {
        return Err(AppError::conflict("User"));
    }

    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4(),
        name: user.name,
        email: user.email,
        password_hash: user.password_hash,
        role: user.role,
        details: user.details,
        created_at: now,
        updated_at: now,
    };
    tables.users.push(user.clone());
    Ok(user)
}

#[async_trait]
impl UserRepository for MemoryUsers {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let tables = self.0.lock().unwrap();
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let tables = self.0.lock().unwrap();
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<User>> {
        let tables = self.0.lock().unwrap();
        Ok(tables
            .users
            .iter()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }

    async fn create(&self, user: NewUser) -> AppResult<User> {
        let mut tables = self.0.lock().unwrap();
        insert_user(&mut tables, user)
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        Ok(self.0.lock().unwrap().users.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut tables = self.0.lock().unwrap();
        let before = tables.users.len();
        tables.users.retain(|u| u.id != id);
        if tables.users.len() == before {
            return Err(AppError::not_found("User"));
        }

        let profiles: Vec<Uuid> = tables
            .doctors
            .iter()
            .filter(|d| d.user_id == id)
            .map(|d| d.id)
            .collect();
        tables.doctors.retain(|d| d.user_id != id);
        tables
            .appointments
            .retain(|a| a.patient_id != id && !profiles.contains(&a.doctor_id));
        Ok(())
    }

    async fn count_by_role(&self, role: UserRole) -> AppResult<u64> {
        let tables = self.0.lock().unwrap();
        Ok(tables.users.iter().filter(|u| u.role == role).count() as u64)
    }
}

#[async_trait]
impl DoctorRepository for MemoryDoctors {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<DoctorProfile>> {
        let tables = self.0.lock().unwrap();
        Ok(tables.doctors.iter().find(|d| d.id == id).cloned())
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> AppResult<Option<DoctorProfile>> {
        let tables = self.0.lock().unwrap();
        Ok(tables.doctors.iter().find(|d| d.user_id == user_id).cloned())
    }

    async fn find_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<DoctorProfile>> {
        let tables = self.0.lock().unwrap();
        Ok(tables
            .doctors
            .iter()
            .filter(|d| ids.contains(&d.id))
            .cloned()
            .collect())
    }

    async fn list(&self) -> AppResult<Vec<DoctorProfile>> {
        Ok(self.0.lock().unwrap().doctors.clone())
    }

    async fn create_with_user(
        &self,
        user: NewUser,
        profile: NewDoctorProfile,
    ) -> AppResult<(User, DoctorProfile)> {
        let mut tables = self.0.lock().unwrap();
        let user = insert_user(&mut tables, user)?;
        let profile = DoctorProfile {
            id: Uuid::new_v4(),
            user_id: user.id,
            specialization: profile.specialization,
            experience: profile.experience,
            fees_per_consultation: profile.fees_per_consultation,
            department: profile.department,
            bio: profile.bio,
            created_at: Utc::now(),
        };
        tables.doctors.push(profile.clone());
        Ok((user, profile))
    }
}

fn sorted_by_date(mut appointments: Vec<Appointment>) -> Vec<Appointment> {
    appointments.sort_by_key(|a| a.date);
    appointments
}

#[async_trait]
impl AppointmentRepository for MemoryAppointments {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Appointment>> {
        let tables = self.0.lock().unwrap();
        Ok(tables.appointments.iter().find(|a| a.id == id).cloned())
    }

    async fn create(&self, appointment: NewAppointment) -> AppResult<Appointment> {
        let mut tables = self.0.lock().unwrap();
        let appointment = Appointment {
            id: Uuid::new_v4(),
            patient_id: appointment.patient_id,
            doctor_id: appointment.doctor_id,
            date: appointment.date,
            status: AppointmentStatus::Pending,
            reason: appointment.reason,
            created_at: Utc::now(),
        };
        tables.appointments.push(appointment.clone());
        Ok(appointment)
    }

    async fn update_status(&self, id: Uuid, status: AppointmentStatus) -> AppResult<Appointment> {
        let mut tables = self.0.lock().unwrap();
        let appointment = tables
            .appointments
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| AppError::not_found("Appointment"))?;
        appointment.status = status;
        Ok(appointment.clone())
    }

    async fn list_by_patient(&self, patient_id: Uuid) -> AppResult<Vec<Appointment>> {
        let tables = self.0.lock().unwrap();
        Ok(sorted_by_date(
            tables
                .appointments
                .iter()
                .filter(|a| a.patient_id == patient_id)
                .cloned()
                .collect(),
        ))
    }

    async fn list_by_doctor(&self, doctor_id: Uuid) -> AppResult<Vec<Appointment>> {
        let tables = self.0.lock().unwrap();
        Ok(sorted_by_date(
            tables
                .appointments
                .iter()
                .filter(|a| a.doctor_id == doctor_id)
                .cloned()
                .collect(),
        ))
    }

    async fn list_all(&self) -> AppResult<Vec<Appointment>> {
        Ok(sorted_by_date(self.0.lock().unwrap().appointments.clone()))
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.0.lock().unwrap().appointments.len() as u64)
    }

    async fn count_by_status(&self, status: AppointmentStatus) -> AppResult<u64> {
        let tables = self.0.lock().unwrap();
        Ok(tables
            .appointments
            .iter()
            .filter(|a| a.status == status)
            .count() as u64)
    }
}

/// Unit of Work over shared in-memory tables.
pub struct MemoryStore {
    tables: Shared,
    users: Arc<MemoryUsers>,
    doctors: Arc<MemoryDoctors>,
    appointments: Arc<MemoryAppointments>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let tables: Shared = Arc::default();
        Self {
            users: Arc::new(MemoryUsers(tables.clone())),
            doctors: Arc::new(MemoryDoctors(tables.clone())),
            appointments: Arc::new(MemoryAppointments(tables.clone())),
            tables,
        }
    }

    /// Direct read access for assertions.
    pub fn with_tables<R>(&self, f: impl FnOnce(&Tables) -> R) -> R {
        let tables = self.tables.lock().unwrap();
        f(&*tables)
    }
}

impl UnitOfWork for MemoryStore {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn doctors(&self) -> Arc<dyn DoctorRepository> {
        self.doctors.clone()
    }

    fn appointments(&self) -> Arc<dyn AppointmentRepository> {
        self.appointments.clone()
    }
}

/// Router over a fresh in-memory store. Rate limiting is off (no Redis).
pub fn test_app() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let config = test_config();
    let services = Services::from_unit_of_work(store.clone(), config.clone());
    let app = create_router(AppState::from_services(&services), &config);
    (app, store)
}

/// Send one request through the router and decode the JSON reply.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, json)
}

pub fn token_of(response: &Value) -> String {
    response["token"].as_str().unwrap().to_string()
}
