//! Public doctor directory.

use axum::{
    extract::State,
    response::Json,
    routing::get,
    Router,
};
use uuid::Uuid;

use crate::api::extractors::ValidatedPath;
use crate::api::AppState;
use crate::domain::DoctorResponse;
use crate::errors::AppResult;

pub fn doctor_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_doctors))
        .route("/:id", get(get_doctor))
}

/// List doctors
#[utoipa::path(
    get,
    path = "/api/doctors",
    tag = "Doctors",
    responses((status = 200, description = "All doctor profiles", body = Vec<DoctorResponse>))
)]
pub async fn list_doctors(State(state): State<AppState>) -> AppResult<Json<Vec<DoctorResponse>>> {
    let doctors = state.doctor_service.list_doctors().await?;
    Ok(Json(doctors))
}

/// Get one doctor
#[utoipa::path(
    get,
    path = "/api/doctors/{id}",
    tag = "Doctors",
    params(("id" = Uuid, Path, description = "Doctor profile ID")),
    responses(
        (status = 200, description = "Doctor profile", body = DoctorResponse),
        (status = 404, description = "Doctor not found")
    )
)]
pub async fn get_doctor(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<Uuid>,
) -> AppResult<Json<DoctorResponse>> {
    let doctor = state.doctor_service.get_doctor(id).await?;
    Ok(Json(doctor))
}
