//! OpenAPI documentation configuration.
//!
//! Served through Swagger UI at `/swagger-ui`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{admin_handler, appointment_handler, auth_handler, doctor_handler};
use crate::domain::{
    Appointment, AppointmentStatus, AppointmentView, AuthResponse, BookAppointmentRequest,
    DoctorResponse, DoctorSummary, PatientDetails, PatientSummary, RegisterRequest, UserResponse,
    UserRole,
};
use crate::services::AdminStats;
use crate::types::MessageResponse;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "MediBook API",
        version = "0.1.0",
        description = "Appointment booking for patients, doctors and clinic administrators"
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    paths(
        auth_handler::register,
        auth_handler::login,
        auth_handler::me,
        appointment_handler::my_appointments,
        appointment_handler::book_appointment,
        appointment_handler::update_status,
        doctor_handler::list_doctors,
        doctor_handler::get_doctor,
        admin_handler::list_users,
        admin_handler::delete_user,
        admin_handler::list_doctors,
        admin_handler::stats,
    ),
    components(
        schemas(
            UserRole,
            UserResponse,
            PatientDetails,
            AuthResponse,
            RegisterRequest,
            auth_handler::LoginRequest,
            DoctorResponse,
            Appointment,
            AppointmentStatus,
            AppointmentView,
            DoctorSummary,
            PatientSummary,
            BookAppointmentRequest,
            appointment_handler::UpdateStatusRequest,
            AdminStats,
            MessageResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login and the current session"),
        (name = "Appointments", description = "Booking and status changes"),
        (name = "Doctors", description = "Public doctor directory"),
        (name = "Admin", description = "User management and statistics")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token returned by /api/auth/login"))
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documents_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<_> = doc.paths.paths.keys().cloned().collect();

        for path in [
            "/api/auth/register",
            "/api/auth/login",
            "/api/auth/me",
            "/api/appointments",
            "/api/appointments/my",
            "/api/appointments/{id}/status",
            "/api/doctors",
            "/api/doctors/{id}",
            "/api/admin/users",
            "/api/admin/users/{id}",
            "/api/admin/doctors",
            "/api/admin/stats",
        ] {
            assert!(paths.iter().any(|p| p == path), "missing {}", path);
        }
    }
}
