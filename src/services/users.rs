//! Accounts, authentication and profile service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::{
        enums::Role,
        user::{LoginResponse, OtpSentResponse, SignupRequest, UpdateProfile, User, UserClaims},
    },
    repository::{users::NewUser, Repository},
};

use super::{email::EmailService, otp::OtpService};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
    otp: OtpService,
    email: EmailService,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig, otp: OtpService, email: EmailService) -> Self {
        Self { repository, config, otp, email }
    }

    /// Register an unverified account and e-mail it a verification code
    pub async fn signup(&self, request: SignupRequest) -> AppResult<OtpSentResponse> {
        if self.repository.users.email_exists(&request.email).await? {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let password_hash = hash_password(&request.password)?;
        let role: Role = request.role.map(Role::from).unwrap_or(Role::User);

        let user = self
            .repository
            .users
            .create(&NewUser {
                email: &request.email,
                password_hash: &password_hash,
                full_name: &request.full_name,
                role,
                email_verified: false,
            })
            .await?;

        tracing::info!(user_id = user.id, %role, "Account created, awaiting verification");
        self.send_code(&user.email).await
    }

    /// Consume a verification code and sign the user in
    pub async fn verify_otp(&self, email: &str, code: &str) -> AppResult<LoginResponse> {
        let user = self
            .repository
            .users
            .get_by_email(email)
            .await?
            .ok_or_else(|| AppError::BadRequest("Invalid or expired verification code".to_string()))?;

        if !self.otp.verify(&user.email, code).await? {
            return Err(AppError::BadRequest("Invalid or expired verification code".to_string()));
        }

        let user = if user.email_verified {
            user
        } else {
            self.repository.users.mark_email_verified(user.id).await?
        };
        tracing::info!(user_id = user.id, "Email verified");

        if user.is_banned() {
            return Err(AppError::Authorization("Account is banned".to_string()));
        }
        self.login_response(user)
    }

    /// Issue a new code for an account that is not yet verified
    pub async fn resend_otp(&self, email: &str) -> AppResult<OtpSentResponse> {
        let user = self
            .repository
            .users
            .get_by_email(email)
            .await?
            .ok_or_else(|| AppError::NotFound("No account registered with this email".to_string()))?;

        if user.email_verified {
            return Err(AppError::BadRequest("Email is already verified".to_string()));
        }
        self.send_code(&user.email).await
    }

    /// Check credentials and return a JWT
    pub async fn login(&self, email: &str, password: &str) -> AppResult<LoginResponse> {
        let user = self
            .repository
            .users
            .get_by_email(email)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid email or password".to_string()))?;

        if !verify_password(&user, password)? {
            tracing::warn!(user_id = user.id, "Failed login attempt");
            return Err(AppError::Authentication("Invalid email or password".to_string()));
        }
        if user.is_banned() {
            return Err(AppError::Authorization("Account is banned".to_string()));
        }
        if !user.email_verified {
            return Err(AppError::Authorization("Email address is not verified".to_string()));
        }

        tracing::info!(user_id = user.id, "User logged in");
        self.login_response(user)
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    /// Update own profile; a new password requires the current one
    pub async fn update_profile(&self, user_id: i32, profile: UpdateProfile) -> AppResult<User> {
        let user = self.repository.users.get_by_id(user_id).await?;

        let password = match profile.new_password.as_deref() {
            Some(new_password) => {
                let current = profile.current_password.as_deref().ok_or_else(|| {
                    AppError::Validation("Current password required to change password".to_string())
                })?;
                if !verify_password(&user, current)? {
                    return Err(AppError::Authentication("Current password is incorrect".to_string()));
                }
                Some(hash_password(new_password)?)
            }
            None => None,
        };

        self.repository.users.update_profile(user_id, &profile, password).await
    }

    /// Create the configured administrator when it does not exist yet
    pub async fn ensure_admin(&self) -> AppResult<()> {
        let (Some(email), Some(password)) = (&self.config.admin_email, &self.config.admin_password) else {
            return Ok(());
        };

        if let Some(existing) = self.repository.users.get_by_email(email).await? {
            if existing.role != Role::Admin {
                tracing::warn!(user_id = existing.id, "Bootstrap admin email belongs to a non-admin account");
            }
            return Ok(());
        }

        let password_hash = hash_password(password)?;
        let admin = self
            .repository
            .users
            .create(&NewUser {
                email,
                password_hash: &password_hash,
                full_name: "Administrator",
                role: Role::Admin,
                email_verified: true,
            })
            .await?;
        tracing::info!(user_id = admin.id, "Bootstrap administrator created");
        Ok(())
    }

    async fn send_code(&self, email: &str) -> AppResult<OtpSentResponse> {
        let code = self.otp.issue(email).await?;
        let ttl_minutes = self.otp.ttl_minutes();

        if let Err(e) = self.email.send_verification_code(email, &code, ttl_minutes).await {
            // The code stays valid so the user can ask for a resend
            tracing::error!("Failed to send verification code to {}: {}", email, e);
            return Err(e);
        }

        Ok(OtpSentResponse {
            email: email.to_string(),
            message: "Verification code sent".to_string(),
            expires_in_minutes: ttl_minutes,
        })
    }

    fn login_response(&self, user: User) -> AppResult<LoginResponse> {
        let claims = UserClaims::new(&user, self.config.jwt_expiration_hours);
        let token = claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;

        Ok(LoginResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_in: self.config.jwt_expiration_hours as i64 * 3600,
            user,
        })
    }
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

fn verify_password(user: &User, password: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(&user.password)
        .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::UserStatus;
    use chrono::Utc;

    fn user_with_password(password: &str) -> User {
        User {
            id: 1,
            email: "a@b.io".to_string(),
            password: hash_password(password).unwrap(),
            full_name: "Ada".to_string(),
            phone: None,
            avatar_url: None,
            role: Role::User,
            status: UserStatus::Active,
            email_verified: true,
            crea_date: Utc::now(),
            modif_date: None,
        }
    }

    #[test]
    fn test_password_hash_verifies() {
        let user = user_with_password("secret1");
        assert!(user.password.starts_with("$argon2"));
        assert!(verify_password(&user, "secret1").unwrap());
        assert!(!verify_password(&user, "secret2").unwrap());
    }

    #[test]
    fn test_salt_differs_per_hash() {
        assert_ne!(hash_password("same").unwrap(), hash_password("same").unwrap());
    }

    #[test]
    fn test_corrupt_hash_is_internal_error() {
        let mut user = user_with_password("x");
        user.password = "plain".to_string();
        assert!(matches!(verify_password(&user, "x"), Err(AppError::Internal(_))));
    }
}
