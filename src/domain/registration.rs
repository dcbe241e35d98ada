//! Sign-up input.
//!
//! The wire format is one flat JSON object whose `role` decides which of the
//! remaining fields matter. `RegisterRequest::into_registration` turns it into
//! a [`Registration`] carrying exactly the fields of that role, or fails before
//! anything is persisted.

use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use super::doctor::NewDoctorProfile;
use super::user::{PatientDetails, UserRole};
use crate::config::MAX_PATIENT_AGE;
use crate::errors::{AppError, AppResult};

/// User registration request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[serde(default)]
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "jane@example.com")]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "SecurePass123!", min_length = 8)]
    pub password: String,
    /// `patient` (default), `doctor` or `admin`
    #[schema(example = "patient")]
    pub role: Option<String>,

    // Patient details
    #[validate(range(min = 0, max = 150, message = "Age must be between 0 and 150"))]
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub blood_group: Option<String>,

    // Doctor details
    #[schema(example = "Cardiology")]
    pub specialization: Option<String>,
    #[validate(range(min = 0, message = "Experience cannot be negative"))]
    pub experience: Option<i32>,
    #[validate(range(min = 0.0, message = "Consultation fees cannot be negative"))]
    pub fees_per_consultation: Option<f64>,
    pub department: Option<String>,
    pub bio: Option<String>,
}

/// Role-specific part of a registration.
#[derive(Debug, Clone, PartialEq)]
pub enum RoleRegistration {
    Patient(PatientDetails),
    Doctor {
        profile: NewDoctorProfile,
        phone: Option<String>,
    },
    Admin,
}

impl RoleRegistration {
    pub fn role(&self) -> UserRole {
        match self {
            RoleRegistration::Patient(_) => UserRole::Patient,
            RoleRegistration::Doctor { .. } => UserRole::Doctor,
            RoleRegistration::Admin => UserRole::Admin,
        }
    }
}

/// A registration that has passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: RoleRegistration,
}

impl Registration {
    pub fn role(&self) -> UserRole {
        self.role.role()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(value: Option<String>, message: &str) -> AppResult<String> {
    non_empty(value).ok_or_else(|| AppError::validation(message))
}

impl RegisterRequest {
    /// Resolve the role and keep only the fields that belong to it.
    ///
    /// Call after `validate()`; this checks the cross-field rules the
    /// derive cannot express.
    pub fn into_registration(self) -> AppResult<Registration> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::validation("Name is required"));
        }
        let email = self.email.trim().to_lowercase();
        if email.is_empty() {
            return Err(AppError::validation("Email is required"));
        }

        let role = match non_empty(self.role) {
            Some(role) => role.parse()?,
            None => UserRole::Patient,
        };

        let role = match role {
            UserRole::Patient => {
                if let Some(age) = self.age {
                    if !(0..=MAX_PATIENT_AGE).contains(&age) {
                        return Err(AppError::validation("Age must be between 0 and 150"));
                    }
                }
                RoleRegistration::Patient(PatientDetails {
                    age: self.age,
                    gender: non_empty(self.gender),
                    phone: non_empty(self.phone),
                    address: non_empty(self.address),
                    blood_group: non_empty(self.blood_group),
                })
            }
            UserRole::Doctor => {
                let specialization = required(self.specialization, "Please add specialization")?;
                let experience = self
                    .experience
                    .ok_or_else(|| AppError::validation("Please add experience years"))?;
                let fees_per_consultation = self
                    .fees_per_consultation
                    .ok_or_else(|| AppError::validation("Please add consultation fees"))?;
                let department = required(self.department, "Please add department")?;

                if experience < 0 {
                    return Err(AppError::validation("Experience cannot be negative"));
                }
                if !fees_per_consultation.is_finite() || fees_per_consultation < 0.0 {
                    return Err(AppError::validation("Consultation fees cannot be negative"));
                }

                RoleRegistration::Doctor {
                    profile: NewDoctorProfile {
                        specialization,
                        experience,
                        fees_per_consultation,
                        department,
                        bio: non_empty(self.bio),
                    },
                    phone: non_empty(self.phone),
                }
            }
            UserRole::Admin => RoleRegistration::Admin,
        };

        Ok(Registration {
            name,
            email,
            password: self.password,
            role,
        })
    }
}
