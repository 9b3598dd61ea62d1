//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{admin, auth, bookings, health, venues};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Courtside API",
        version = "1.0.0",
        description = "Sports venue discovery and court booking REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::signup,
        auth::verify_otp,
        auth::resend_otp,
        auth::login,
        auth::me,
        auth::update_profile,
        // Venues
        venues::list_venues,
        venues::get_venue,
        venues::create_review,
        // Owner
        venues::list_my_venues,
        venues::get_my_venue,
        venues::create_venue,
        venues::update_venue,
        venues::create_court,
        venues::update_court,
        // Bookings
        bookings::create_booking,
        bookings::list_my_bookings,
        bookings::get_booking_status,
        bookings::cancel_booking,
        // Admin
        admin::list_users,
        admin::ban_user,
        admin::unban_user,
        admin::list_venues,
        admin::venue_validation,
        admin::approve_venue,
        admin::reject_venue,
        admin::stats,
    ),
    components(
        schemas(
            // Enums
            crate::models::enums::Role,
            crate::models::enums::UserStatus,
            crate::models::enums::ApprovalStatus,
            crate::models::enums::BookingStatus,
            crate::models::enums::PaymentStatus,
            // Users
            crate::models::user::User,
            crate::models::user::UserShort,
            crate::models::user::SignupRole,
            crate::models::user::SignupRequest,
            crate::models::user::LoginRequest,
            crate::models::user::LoginResponse,
            crate::models::user::VerifyOtpRequest,
            crate::models::user::ResendOtpRequest,
            crate::models::user::OtpSentResponse,
            crate::models::user::UpdateProfile,
            // Venues
            crate::models::venue::DayHours,
            crate::models::venue::OperatingHours,
            crate::models::venue::Venue,
            crate::models::venue::Court,
            crate::models::venue::CreateVenue,
            crate::models::venue::UpdateVenue,
            crate::models::venue::CreateCourt,
            crate::models::venue::UpdateCourt,
            crate::models::venue::PriceRange,
            crate::models::venue::VenueSummary,
            crate::models::venue::VenueDetails,
            crate::models::venue::VenueWithValidation,
            crate::models::venue::RejectVenue,
            crate::models::venue::Review,
            crate::models::venue::CreateReview,
            crate::rules::venue_completeness::CompletenessCheck,
            crate::rules::venue_completeness::ValidationDetails,
            // Bookings
            crate::models::booking::Booking,
            crate::models::booking::BookingVenue,
            crate::models::booking::BookingCourt,
            crate::models::booking::BookingDetails,
            crate::models::booking::BookingStatusResponse,
            crate::models::booking::CreateBooking,
            crate::rules::booking_status::BookingTiming,
            // Stats
            crate::models::stats::Breakdown,
            crate::models::stats::AdminStats,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Signup, verification and login"),
        (name = "venues", description = "Public venue listing and reviews"),
        (name = "owner", description = "Venue and court management for facility owners"),
        (name = "bookings", description = "Court bookings"),
        (name = "admin", description = "Moderation and statistics")
    )
)]
pub struct ApiDoc;

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
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_booking_status_path() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/bookings/{id}/status"));
        assert!(doc.paths.paths.contains_key("/admin/venues/{id}/validation"));
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
