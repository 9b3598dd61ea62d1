//! API handlers for Courtside REST endpoints

pub mod admin;
pub mod auth;
pub mod bookings;
pub mod health;
pub mod openapi;
pub mod venues;

use anyhow::Context;
use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Request},
    http::{header::AUTHORIZATION, request::Parts},
    routing::{get, post, put},
    Json, Router,
};
use serde::de::DeserializeOwned;
use tower::ServiceBuilder;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use validator::Validate;

use crate::{error::AppError, models::user::UserClaims, AppState};

/// Extractor for authenticated user from JWT token
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))?;

        let claims = UserClaims::from_token(token, &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        let user = state
            .repository
            .users
            .get_by_id(claims.user_id)
            .await
            .map_err(|e| match e {
                AppError::NotFound(_) => AppError::Authentication("Account no longer exists".to_string()),
                other => other,
            })?;

        Ok(AuthenticatedUser(claims.refreshed(&user)?))
    }
}

/// Like `Json<T>`, but runs `Validate::validate` on the body
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::Validation(format!("Invalid JSON: {}", rejection.body_text())))?;

        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> anyhow::Result<Router> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Per-IP rate limit on credential and code endpoints
    let governor = GovernorConfigBuilder::default()
        .per_second(state.config.auth.rate_limit_per_second)
        .burst_size(state.config.auth.rate_limit_burst)
        .finish()
        .context("Invalid rate limit configuration")?;

    let auth_public = Router::new()
        .route("/auth/signup", post(auth::signup))
        .route("/auth/verify-otp", post(auth::verify_otp))
        .route("/auth/resend-otp", post(auth::resend_otp))
        .route("/auth/login", post(auth::login))
        .layer(GovernorLayer {
            // The layer wants a config that lives as long as the server
            config: Box::leak(Box::new(governor)),
        });

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Authentication
        .merge(auth_public)
        .route("/auth/me", get(auth::me))
        .route("/auth/profile", put(auth::update_profile))
        // Public venues
        .route("/venues", get(venues::list_venues))
        .route("/venues/:id", get(venues::get_venue))
        .route("/venues/:id/reviews", post(venues::create_review))
        // Facility owners
        .route(
            "/owner/venues",
            get(venues::list_my_venues).post(venues::create_venue),
        )
        .route(
            "/owner/venues/:id",
            get(venues::get_my_venue).put(venues::update_venue),
        )
        .route("/owner/venues/:id/courts", post(venues::create_court))
        .route("/owner/courts/:id", put(venues::update_court))
        // Bookings
        .route(
            "/bookings",
            get(bookings::list_my_bookings).post(bookings::create_booking),
        )
        .route("/bookings/:id/status", get(bookings::get_booking_status))
        .route("/bookings/:id/cancel", post(bookings::cancel_booking))
        // Administration
        .route("/admin/users", get(admin::list_users))
        .route("/admin/users/:id/ban", put(admin::ban_user))
        .route("/admin/users/:id/unban", put(admin::unban_user))
        .route("/admin/venues", get(admin::list_venues))
        .route("/admin/venues/:id/validation", get(admin::venue_validation))
        .route("/admin/venues/:id/approve", put(admin::approve_venue))
        .route("/admin/venues/:id/reject", put(admin::reject_venue))
        .route("/admin/stats", get(admin::stats))
        .with_state(state);

    Ok(Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors),
        ))
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use sqlx::postgres::PgPoolOptions;

    use crate::{
        config::AppConfig,
        models::{enums::Role, user::UserClaims},
        repository::Repository,
        services::{otp::MemoryOtpStore, Services},
        AppState,
    };

    pub const JWT_SECRET: &str = "router-test-secret";

    /// State over a pool that never connects; only usable for requests
    /// rejected before any query runs
    pub fn offline_state() -> AppState {
        let mut config = AppConfig {
            server: Default::default(),
            database: Default::default(),
            auth: Default::default(),
            logging: Default::default(),
            email: Default::default(),
            redis: Default::default(),
            otp: Default::default(),
        };
        config.auth.jwt_secret = JWT_SECRET.to_string();
        config.database.url = "postgres://nobody@127.0.0.1:1/none".to_string();

        let pool = PgPoolOptions::new()
            .connect_lazy(&config.database.url)
            .expect("lazy pool");
        let repository = Repository::new(pool);
        let services = Services::new(repository.clone(), &config, Arc::new(MemoryOtpStore::new()));

        AppState {
            config: Arc::new(config),
            services: Arc::new(services),
            repository,
        }
    }

    pub fn token(user_id: i32, role: Role, secret: &str) -> String {
        let now = chrono::Utc::now().timestamp();
        UserClaims {
            sub: format!("user{}@example.com", user_id),
            user_id,
            role,
            exp: now + 3600,
            iat: now,
        }
        .create_token(secret)
        .expect("token")
    }
}
