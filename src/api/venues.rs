//! Public venue listing, reviews and owner management

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        pagination::PaginatedResponse,
        venue::{
            Court, CreateCourt, CreateReview, CreateVenue, Review, UpdateCourt, UpdateVenue,
            VenueDetails, VenueQuery, VenueSummary, VenueWithValidation,
        },
    },
};

use super::{AuthenticatedUser, ValidatedJson};

/// List bookable venues
#[utoipa::path(
    get,
    path = "/venues",
    tag = "venues",
    params(VenueQuery),
    responses(
        (status = 200, description = "Complete, approved venues", body = PaginatedResponse<VenueSummary>)
    )
)]
pub async fn list_venues(
    State(state): State<crate::AppState>,
    Query(query): Query<VenueQuery>,
) -> AppResult<Json<PaginatedResponse<VenueSummary>>> {
    let page = state.services.venues.list_public(&query).await?;
    Ok(Json(page))
}

/// Venue page with its active courts
#[utoipa::path(
    get,
    path = "/venues/{id}",
    tag = "venues",
    params(("id" = i32, Path, description = "Venue ID")),
    responses(
        (status = 200, description = "Venue details", body = VenueDetails),
        (status = 404, description = "Venue not found or not listed")
    )
)]
pub async fn get_venue(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<VenueDetails>> {
    let venue = state.services.venues.get_public(id).await?;
    Ok(Json(venue))
}

/// Review a venue
#[utoipa::path(
    post,
    path = "/venues/{id}/reviews",
    tag = "venues",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Venue ID")),
    request_body = CreateReview,
    responses(
        (status = 201, description = "Review created", body = Review),
        (status = 404, description = "Venue not found or not listed"),
        (status = 409, description = "Venue already reviewed")
    )
)]
pub async fn create_review(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    ValidatedJson(review): ValidatedJson<CreateReview>,
) -> AppResult<(StatusCode, Json<Review>)> {
    let created = state.services.venues.create_review(&claims, id, review).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Venues owned by the caller, with their listing checklist
#[utoipa::path(
    get,
    path = "/owner/venues",
    tag = "owner",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Owned venues", body = Vec<VenueWithValidation>),
        (status = 403, description = "Facility owner account required")
    )
)]
pub async fn list_my_venues(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<VenueWithValidation>>> {
    let venues = state.services.venues.list_owned(&claims).await?;
    Ok(Json(venues))
}

#[utoipa::path(
    get,
    path = "/owner/venues/{id}",
    tag = "owner",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Venue ID")),
    responses(
        (status = 200, description = "Owned venue", body = VenueWithValidation),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Venue not found")
    )
)]
pub async fn get_my_venue(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<VenueWithValidation>> {
    let venue = state.services.venues.get_owned(&claims, id).await?;
    Ok(Json(venue))
}

/// Create a venue (pending approval)
#[utoipa::path(
    post,
    path = "/owner/venues",
    tag = "owner",
    security(("bearer_auth" = [])),
    request_body = CreateVenue,
    responses(
        (status = 201, description = "Venue created", body = VenueWithValidation),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Facility owner account required")
    )
)]
pub async fn create_venue(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ValidatedJson(venue): ValidatedJson<CreateVenue>,
) -> AppResult<(StatusCode, Json<VenueWithValidation>)> {
    let created = state.services.venues.create(&claims, venue).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update a venue; a rejected venue goes back to review
#[utoipa::path(
    put,
    path = "/owner/venues/{id}",
    tag = "owner",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Venue ID")),
    request_body = UpdateVenue,
    responses(
        (status = 200, description = "Venue updated", body = VenueWithValidation),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Venue not found")
    )
)]
pub async fn update_venue(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    ValidatedJson(venue): ValidatedJson<UpdateVenue>,
) -> AppResult<Json<VenueWithValidation>> {
    let updated = state.services.venues.update(&claims, id, venue).await?;
    Ok(Json(updated))
}

#[utoipa::path(
    post,
    path = "/owner/venues/{id}/courts",
    tag = "owner",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Venue ID")),
    request_body = CreateCourt,
    responses(
        (status = 201, description = "Court created", body = Court),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Venue not found")
    )
)]
pub async fn create_court(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    ValidatedJson(court): ValidatedJson<CreateCourt>,
) -> AppResult<(StatusCode, Json<Court>)> {
    let created = state.services.venues.create_court(&claims, id, court).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put,
    path = "/owner/courts/{id}",
    tag = "owner",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Court ID")),
    request_body = UpdateCourt,
    responses(
        (status = 200, description = "Court updated", body = Court),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Court not found")
    )
)]
pub async fn update_court(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    ValidatedJson(court): ValidatedJson<UpdateCourt>,
) -> AppResult<Json<Court>> {
    let updated = state.services.venues.update_court(&claims, id, court).await?;
    Ok(Json(updated))
}
