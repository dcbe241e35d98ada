//! Admin handlers. Routes require a session; each handler checks the role.

use axum::{
    extract::State,
    response::Json,
    routing::{delete, get},
    Extension, Router,
};
use uuid::Uuid;

use crate::api::extractors::ValidatedPath;
use crate::api::middleware::{require_admin, CurrentUser};
use crate::api::AppState;
use crate::domain::{DoctorResponse, UserResponse};
use crate::errors::AppResult;
use crate::services::AdminStats;
use crate::types::MessageResponse;

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/:id", delete(delete_user))
        .route("/doctors", get(list_doctors))
        .route("/stats", get(stats))
}

/// List all users
#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "Admin",
    responses(
        (status = 200, description = "All users, oldest first", body = Vec<UserResponse>),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_users(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<UserResponse>>> {
    require_admin(&current_user)?;

    let users = state.user_service.list_users().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Delete a user with their profile and appointments
#[utoipa::path(
    delete,
    path = "/api/admin/users/{id}",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User removed", body = MessageResponse),
        (status = 400, description = "Admins cannot delete themselves"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedPath(id): ValidatedPath<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    require_admin(&current_user)?;

    state
        .user_service
        .delete_user(current_user.identity(), id)
        .await?;

    Ok(Json(MessageResponse::new("User removed")))
}

/// List all doctors
#[utoipa::path(
    get,
    path = "/api/admin/doctors",
    tag = "Admin",
    responses(
        (status = 200, description = "All doctor profiles", body = Vec<DoctorResponse>),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_doctors(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<DoctorResponse>>> {
    require_admin(&current_user)?;

    let doctors = state.doctor_service.list_doctors().await?;
    Ok(Json(doctors))
}

/// Platform statistics
#[utoipa::path(
    get,
    path = "/api/admin/stats",
    tag = "Admin",
    responses(
        (status = 200, description = "Headline counts", body = AdminStats),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = []))
)]
pub async fn stats(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<AdminStats>> {
    require_admin(&current_user)?;

    let stats = state.user_service.stats().await?;
    Ok(Json(stats))
}
