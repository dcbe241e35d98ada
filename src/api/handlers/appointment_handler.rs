//! Appointment handlers. Every route here requires a session.

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::{ValidatedJson, ValidatedPath};
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{Appointment, AppointmentView, BookAppointmentRequest};
use crate::errors::AppResult;

/// Status change request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateStatusRequest {
    /// One of `approved`, `cancelled`, `completed`
    #[serde(default)]
    #[validate(length(min = 1, message = "Please provide a status"))]
    #[schema(example = "approved")]
    pub status: String,
}

pub fn appointment_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(book_appointment))
        .route("/my", get(my_appointments))
        .route("/:id/status", put(update_status))
}

/// Appointments visible to the caller
#[utoipa::path(
    get,
    path = "/api/appointments/my",
    tag = "Appointments",
    responses(
        (status = 200, description = "Patients see their bookings, doctors their schedule, admins everything", body = Vec<AppointmentView>),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Doctor account has no profile")
    ),
    security(("bearer_auth" = []))
)]
pub async fn my_appointments(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<AppointmentView>>> {
    let appointments = state
        .appointment_service
        .list_mine(current_user.identity())
        .await?;

    Ok(Json(appointments))
}

/// Book an appointment
#[utoipa::path(
    post,
    path = "/api/appointments",
    tag = "Appointments",
    request_body = BookAppointmentRequest,
    responses(
        (status = 201, description = "Appointment booked as pending", body = Appointment),
        (status = 400, description = "Missing fields or unparseable date"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Only patients can book"),
        (status = 404, description = "Doctor not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn book_appointment(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<BookAppointmentRequest>,
) -> AppResult<(StatusCode, Json<Appointment>)> {
    let appointment = state
        .appointment_service
        .book(current_user.identity(), payload)
        .await?;

    Ok((StatusCode::CREATED, Json(appointment)))
}

/// Change an appointment's status
#[utoipa::path(
    put,
    path = "/api/appointments/{id}/status",
    tag = "Appointments",
    params(("id" = Uuid, Path, description = "Appointment ID")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Updated appointment", body = Appointment),
        (status = 400, description = "Unknown status or transition not allowed"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller may not change this appointment"),
        (status = 404, description = "Appointment not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_status(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedPath(id): ValidatedPath<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateStatusRequest>,
) -> AppResult<Json<Appointment>> {
    let appointment = state
        .appointment_service
        .update_status(current_user.identity(), id, &payload.status)
        .await?;

    Ok(Json(appointment))
}
