//! Email service for verification codes and booking notices

use lettre::{
    message::{header::ContentType, Mailbox, Message, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    SmtpTransport, Transport,
};
use std::str::FromStr;

use crate::{
    config::EmailConfig,
    error::{AppError, AppResult},
    models::booking::BookingDetails,
};

#[derive(Clone)]
pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Send the e-mail verification code
    pub async fn send_verification_code(&self, to: &str, code: &str, ttl_minutes: u64) -> AppResult<()> {
        let subject = "Your Courtside verification code";
        let body = format!(
            r#"
Your verification code is: {code}

This code will expire in {ttl_minutes} minutes.

If you didn't create a Courtside account, please ignore this email.
"#
        );

        self.send_email(to, subject, &body).await
    }

    pub async fn send_booking_confirmation(&self, to: &str, booking: &BookingDetails) -> AppResult<()> {
        let subject = format!("Booking confirmed: {}", booking.court.venue.name);
        let body = format!(
            r#"
Your booking #{id} is confirmed.

Venue: {venue}, {address}
Court: {court}
From: {start}
To:   {end}
Total: {price}
"#,
            id = booking.booking.id,
            venue = booking.court.venue.name,
            address = booking.court.venue.address.as_deref().unwrap_or("-"),
            court = booking.court.name,
            start = booking.booking.start_time.format("%Y-%m-%d %H:%M UTC"),
            end = booking.booking.end_time.format("%Y-%m-%d %H:%M UTC"),
            price = booking.booking.total_price,
        );

        self.send_email(to, &subject, &body).await
    }

    pub async fn send_booking_cancellation(&self, to: &str, booking: &BookingDetails) -> AppResult<()> {
        let subject = format!("Booking cancelled: {}", booking.court.venue.name);
        let body = format!(
            r#"
Your booking #{id} at {venue} ({court}) on {start} has been cancelled.
"#,
            id = booking.booking.id,
            venue = booking.court.venue.name,
            court = booking.court.name,
            start = booking.booking.start_time.format("%Y-%m-%d %H:%M UTC"),
        );

        self.send_email(to, &subject, &body).await
    }

    /// Generic email sending function
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        if !self.config.enabled {
            tracing::info!(to, subject, "Email delivery disabled, message not sent");
            tracing::debug!("{}", body);
            return Ok(());
        }

        let from_name = self
            .config
            .smtp_from_name
            .as_deref()
            .unwrap_or("Courtside");
        let from_mailbox = Mailbox::from_str(&format!("{} <{}>", from_name, self.config.smtp_from))
            .map_err(|e| AppError::Internal(format!("Invalid from address: {}", e)))?;

        let to_mailbox = Mailbox::from_str(to)
            .map_err(|e| AppError::Internal(format!("Invalid to address: {}", e)))?;

        let email = Message::builder()
            .from(from_mailbox)
            .to(to_mailbox)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(format!(
                                r#"<html><body><pre>{}</pre></body></html>"#,
                                body.replace('\n', "<br>")
                            )),
                    ),
            )
            .map_err(|e| AppError::Internal(format!("Failed to build email: {}", e)))?;

        let mailer_builder = if self.config.smtp_use_tls {
            SmtpTransport::starttls_relay(&self.config.smtp_host)
                .map_err(|e| AppError::Internal(format!("Failed to create SMTP transport: {}", e)))?
        } else {
            SmtpTransport::builder_dangerous(&self.config.smtp_host)
        }
        .port(self.config.smtp_port);

        let mailer_builder = match (&self.config.smtp_username, &self.config.smtp_password) {
            (Some(username), Some(password)) => {
                mailer_builder.credentials(Credentials::new(username.clone(), password.clone()))
            }
            _ => mailer_builder,
        };

        let mailer = mailer_builder.build();

        // SmtpTransport is blocking
        tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| AppError::Internal(format!("Email task failed: {}", e)))?
            .map_err(|e| AppError::Internal(format!("Failed to send email: {}", e)))?;

        tracing::info!(to, subject, "Email sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::assert_ok;

    #[tokio::test]
    async fn test_disabled_service_does_not_send() {
        let service = EmailService::new(EmailConfig::default());
        assert_ok!(service.send_verification_code("a@b.io", "123456", 10).await);
        // invalid address is never parsed when delivery is off
        assert_ok!(service.send_verification_code("not an address", "123456", 10).await);
    }
}
