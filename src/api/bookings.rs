//! Booking endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        booking::{BookingDetails, BookingQuery, BookingStatusResponse, CreateBooking},
        pagination::PaginatedResponse,
    },
};

use super::AuthenticatedUser;

/// Book a court
#[utoipa::path(
    post,
    path = "/bookings",
    tag = "bookings",
    security(("bearer_auth" = [])),
    request_body = CreateBooking,
    responses(
        (status = 201, description = "Booking confirmed", body = BookingDetails),
        (status = 400, description = "Invalid time range"),
        (status = 404, description = "Court not found"),
        (status = 409, description = "Slot already booked"),
        (status = 422, description = "Court or venue not bookable")
    )
)]
pub async fn create_booking(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateBooking>,
) -> AppResult<(StatusCode, Json<BookingDetails>)> {
    let booking = state.services.bookings.create(&claims, request).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

/// Own bookings, most recent first
#[utoipa::path(
    get,
    path = "/bookings",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(BookingQuery),
    responses(
        (status = 200, description = "Bookings", body = PaginatedResponse<BookingDetails>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_my_bookings(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<BookingQuery>,
) -> AppResult<Json<PaginatedResponse<BookingDetails>>> {
    let page = state.services.bookings.list_mine(&claims, &query).await?;
    Ok(Json(page))
}

/// Booking with its current timing and cancellation eligibility
#[utoipa::path(
    get,
    path = "/bookings/{id}/status",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking status", body = BookingStatusResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not your booking or account banned"),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn get_booking_status(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<BookingStatusResponse>> {
    let status = state.services.bookings.status(&claims, id).await?;
    Ok(Json(status))
}

#[utoipa::path(
    post,
    path = "/bookings/{id}/cancel",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking cancelled", body = BookingDetails),
        (status = 403, description = "Not your booking"),
        (status = 404, description = "Booking not found"),
        (status = 422, description = "Too late to cancel")
    )
)]
pub async fn cancel_booking(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<BookingDetails>> {
    let booking = state.services.bookings.cancel(&claims, id).await?;
    Ok(Json(booking))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header::AUTHORIZATION, Request, StatusCode},
    };
    use tower::ServiceExt;

    use crate::api::{
        create_router,
        test_support::{offline_state, token, JWT_SECRET},
    };
    use crate::models::enums::Role;

    async fn get_status(authorization: Option<String>) -> StatusCode {
        let app = create_router(offline_state()).unwrap();
        let mut req = Request::builder().uri("/api/v1/bookings/11/status");
        if let Some(value) = authorization {
            req = req.header(AUTHORIZATION, value);
        }
        app.oneshot(req.body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_status_requires_token() {
        assert_eq!(get_status(None).await, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_status_rejects_bad_tokens() {
        let forged = token(3, Role::Admin, "some-other-secret");
        assert_eq!(get_status(Some(format!("Bearer {}", forged))).await, StatusCode::UNAUTHORIZED);
        assert_eq!(get_status(Some("Bearer not.a.jwt".to_string())).await, StatusCode::UNAUTHORIZED);

        let valid = token(3, Role::User, JWT_SECRET);
        assert_eq!(get_status(Some(format!("Token {}", valid))).await, StatusCode::UNAUTHORIZED);
    }
}
