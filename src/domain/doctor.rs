//! Doctor profile entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::user::User;

/// Doctor-specific attributes, one-to-one with a user of role doctor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub specialization: String,
    /// Years of practice
    pub experience: i32,
    pub fees_per_consultation: f64,
    pub department: String,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Validated doctor attributes collected at registration.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDoctorProfile {
    pub specialization: String,
    pub experience: i32,
    pub fees_per_consultation: f64,
    pub department: String,
    pub bio: Option<String>,
}

/// Directory entry: a profile joined with its user's public fields.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DoctorResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    #[schema(example = "Dr. Gregory House")]
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[schema(example = "Cardiology")]
    pub specialization: String,
    pub experience: i32,
    pub fees_per_consultation: f64,
    pub department: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl DoctorResponse {
    pub fn new(profile: DoctorProfile, user: &User) -> Self {
        Self {
            id: profile.id,
            user_id: profile.user_id,
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.details.phone.clone(),
            specialization: profile.specialization,
            experience: profile.experience,
            fees_per_consultation: profile.fees_per_consultation,
            department: profile.department,
            bio: profile.bio,
            created_at: profile.created_at,
        }
    }
}
