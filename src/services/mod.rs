//! Business logic services

pub mod admin;
pub mod bookings;
pub mod email;
pub mod otp;
pub mod redis;
pub mod users;
pub mod venues;

use std::sync::Arc;

use crate::{config::AppConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub users: users::UsersService,
    pub otp: otp::OtpService,
    pub email: email::EmailService,
    pub venues: venues::VenuesService,
    pub bookings: bookings::BookingsService,
    pub admin: admin::AdminService,
}

impl Services {
    /// Create all services; `otp_store` is owned by the caller for the life of the process
    pub fn new(repository: Repository, config: &AppConfig, otp_store: Arc<dyn otp::OtpStore>) -> Self {
        let email = email::EmailService::new(config.email.clone());
        let otp = otp::OtpService::new(otp_store, &config.otp);

        Self {
            users: users::UsersService::new(repository.clone(), config.auth.clone(), otp.clone(), email.clone()),
            venues: venues::VenuesService::new(repository.clone()),
            bookings: bookings::BookingsService::new(repository.clone(), email.clone()),
            admin: admin::AdminService::new(repository),
            otp,
            email,
        }
    }
}
