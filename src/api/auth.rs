//! Signup, e-mail verification, login and own profile

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::AppResult,
    models::user::{
        LoginRequest, LoginResponse, OtpSentResponse, ResendOtpRequest, SignupRequest,
        UpdateProfile, User, VerifyOtpRequest,
    },
};

use super::{AuthenticatedUser, ValidatedJson};

/// Create an account; a verification code is e-mailed
#[utoipa::path(
    post,
    path = "/auth/signup",
    tag = "auth",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created, code sent", body = OtpSentResponse),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn signup(
    State(state): State<crate::AppState>,
    ValidatedJson(request): ValidatedJson<SignupRequest>,
) -> AppResult<(StatusCode, Json<OtpSentResponse>)> {
    let sent = state.services.users.signup(request).await?;
    Ok((StatusCode::CREATED, Json(sent)))
}

/// Verify the e-mailed code and sign in
#[utoipa::path(
    post,
    path = "/auth/verify-otp",
    tag = "auth",
    request_body = VerifyOtpRequest,
    responses(
        (status = 200, description = "Email verified", body = LoginResponse),
        (status = 400, description = "Invalid or expired code")
    )
)]
pub async fn verify_otp(
    State(state): State<crate::AppState>,
    ValidatedJson(request): ValidatedJson<VerifyOtpRequest>,
) -> AppResult<Json<LoginResponse>> {
    let response = state.services.users.verify_otp(&request.email, &request.code).await?;
    Ok(Json(response))
}

/// Send a new verification code
#[utoipa::path(
    post,
    path = "/auth/resend-otp",
    tag = "auth",
    request_body = ResendOtpRequest,
    responses(
        (status = 200, description = "Code sent", body = OtpSentResponse),
        (status = 400, description = "Already verified"),
        (status = 404, description = "Unknown email")
    )
)]
pub async fn resend_otp(
    State(state): State<crate::AppState>,
    ValidatedJson(request): ValidatedJson<ResendOtpRequest>,
) -> AppResult<Json<OtpSentResponse>> {
    let sent = state.services.users.resend_otp(&request.email).await?;
    Ok(Json(sent))
}

/// Authenticate with email and password
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Account banned or email not verified")
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let response = state.services.users.login(&request.email, &request.password).await?;
    Ok(Json(response))
}

/// Get current user
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<User>> {
    let user = state.services.users.get_by_id(claims.user_id).await?;
    Ok(Json(user))
}

/// Update own profile
#[utoipa::path(
    put,
    path = "/auth/profile",
    tag = "auth",
    security(("bearer_auth" = [])),
    request_body = UpdateProfile,
    responses(
        (status = 200, description = "Profile updated", body = User),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Not authenticated or wrong current password")
    )
)]
pub async fn update_profile(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ValidatedJson(profile): ValidatedJson<UpdateProfile>,
) -> AppResult<Json<User>> {
    let updated = state.services.users.update_profile(claims.user_id, profile).await?;
    Ok(Json(updated))
}
