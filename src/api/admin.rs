//! Administration endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::{
    error::AppResult,
    models::{
        enums::UserStatus,
        pagination::PaginatedResponse,
        stats::AdminStats,
        user::{User, UserQuery},
        venue::{AdminVenueQuery, RejectVenue, VenueWithValidation},
    },
    rules::venue_completeness::ValidationDetails,
};

use super::{AuthenticatedUser, ValidatedJson};

/// Search users
#[utoipa::path(
    get,
    path = "/admin/users",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(UserQuery),
    responses(
        (status = 200, description = "Users", body = PaginatedResponse<User>),
        (status = 403, description = "Administrator privileges required")
    )
)]
pub async fn list_users(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<UserQuery>,
) -> AppResult<Json<PaginatedResponse<User>>> {
    claims.require_admin()?;
    let page = state.services.admin.search_users(&query).await?;
    Ok(Json(page))
}

#[utoipa::path(
    put,
    path = "/admin/users/{id}/ban",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User banned", body = User),
        (status = 403, description = "Administrator privileges required"),
        (status = 404, description = "User not found"),
        (status = 422, description = "Target cannot be banned")
    )
)]
pub async fn ban_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<User>> {
    claims.require_admin()?;
    let user = state.services.admin.set_user_status(&claims, id, UserStatus::Banned).await?;
    Ok(Json(user))
}

#[utoipa::path(
    put,
    path = "/admin/users/{id}/unban",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User reinstated", body = User),
        (status = 403, description = "Administrator privileges required"),
        (status = 404, description = "User not found")
    )
)]
pub async fn unban_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<User>> {
    claims.require_admin()?;
    let user = state.services.admin.set_user_status(&claims, id, UserStatus::Active).await?;
    Ok(Json(user))
}

/// Venues for moderation
#[utoipa::path(
    get,
    path = "/admin/venues",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(AdminVenueQuery),
    responses(
        (status = 200, description = "Venues", body = PaginatedResponse<VenueWithValidation>),
        (status = 403, description = "Administrator privileges required")
    )
)]
pub async fn list_venues(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<AdminVenueQuery>,
) -> AppResult<Json<PaginatedResponse<VenueWithValidation>>> {
    claims.require_admin()?;
    let page = state.services.admin.list_venues(&query).await?;
    Ok(Json(page))
}

/// Full listing checklist of a venue
#[utoipa::path(
    get,
    path = "/admin/venues/{id}/validation",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Venue ID")),
    responses(
        (status = 200, description = "Checklist", body = ValidationDetails),
        (status = 404, description = "Venue not found")
    )
)]
pub async fn venue_validation(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ValidationDetails>> {
    claims.require_admin()?;
    let details = state.services.admin.venue_validation(id).await?;
    Ok(Json(details))
}

#[utoipa::path(
    put,
    path = "/admin/venues/{id}/approve",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Venue ID")),
    responses(
        (status = 200, description = "Venue approved", body = VenueWithValidation),
        (status = 404, description = "Venue not found")
    )
)]
pub async fn approve_venue(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<VenueWithValidation>> {
    claims.require_admin()?;
    let venue = state.services.admin.approve_venue(&claims, id).await?;
    Ok(Json(venue))
}

#[utoipa::path(
    put,
    path = "/admin/venues/{id}/reject",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Venue ID")),
    request_body = RejectVenue,
    responses(
        (status = 200, description = "Venue rejected", body = VenueWithValidation),
        (status = 400, description = "Missing reason"),
        (status = 404, description = "Venue not found")
    )
)]
pub async fn reject_venue(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<RejectVenue>,
) -> AppResult<Json<VenueWithValidation>> {
    claims.require_admin()?;
    let venue = state.services.admin.reject_venue(&claims, id, &request.reason).await?;
    Ok(Json(venue))
}

/// Platform counters
#[utoipa::path(
    get,
    path = "/admin/stats",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Counters", body = AdminStats),
        (status = 403, description = "Administrator privileges required")
    )
)]
pub async fn stats(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<AdminStats>> {
    claims.require_admin()?;
    let stats = state.services.admin.stats().await?;
    Ok(Json(stats))
}
