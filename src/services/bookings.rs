//! Court bookings: creation, listing, status and cancellation

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::{
    error::{AppError, AppResult},
    models::{
        booking::{
            BookingDetails, BookingDetailsRow, BookingQuery, BookingStatusResponse, CreateBooking,
            NewBooking,
        },
        pagination::{PaginatedResponse, Pagination},
        user::UserClaims,
        venue::Court,
    },
    repository::Repository,
    rules::venue_completeness::is_complete,
};

use super::email::EmailService;

#[derive(Clone)]
pub struct BookingsService {
    repository: Repository,
    email: EmailService,
}

impl BookingsService {
    pub fn new(repository: Repository, email: EmailService) -> Self {
        Self { repository, email }
    }

    /// Book a court for the caller
    pub async fn create(&self, claims: &UserClaims, request: CreateBooking) -> AppResult<BookingDetails> {
        let court = self.repository.venues.get_court(request.court_id).await?;
        if !court.is_active {
            return Err(AppError::BusinessRule("Court is not available for booking".to_string()));
        }

        let venue = self.repository.venues.get(court.venue_id).await?;
        if !is_complete(&venue) {
            return Err(AppError::BusinessRule("Venue is not open for booking".to_string()));
        }

        let new_booking = quote(
            claims.user_id,
            &court,
            request.start_time,
            request.end_time,
            Utc::now(),
        )?;
        let created = self.repository.bookings.create_if_free(&new_booking).await?;
        tracing::info!(
            booking_id = created.id,
            court_id = court.id,
            user_id = claims.user_id,
            "Booking created"
        );

        let details: BookingDetails = self.repository.bookings.get_details(created.id).await?.into();
        if let Err(e) = self
            .email
            .send_booking_confirmation(&details.user.email, &details)
            .await
        {
            tracing::warn!("Failed to send booking confirmation for {}: {}", created.id, e);
        }
        Ok(details)
    }

    /// The caller's own bookings
    pub async fn list_mine(&self, claims: &UserClaims, query: &BookingQuery) -> AppResult<PaginatedResponse<BookingDetails>> {
        let page = Pagination::new(query.page, query.per_page);
        let (rows, total) = self
            .repository
            .bookings
            .list_for_user(claims.user_id, query.status, page)
            .await?;
        Ok(page.respond(rows.into_iter().map(BookingDetails::from).collect(), total))
    }

    /// Booking with its timing evaluated now
    pub async fn status(&self, claims: &UserClaims, id: i32) -> AppResult<BookingStatusResponse> {
        let row = self.repository.bookings.get_details(id).await?;
        status_view(claims, row, Utc::now())
    }

    /// Cancel a booking that is still outside the cancellation window
    pub async fn cancel(&self, claims: &UserClaims, id: i32) -> AppResult<BookingDetails> {
        let row = self.repository.bookings.get_details(id).await?;
        claims.require_owner_or_admin(row.booking.user_id)?;

        // Checked again under a row lock by the repository
        let now = Utc::now();
        row.booking.ensure_cancellable(now)?;

        let cancelled = self.repository.bookings.cancel(id, now).await?;
        tracing::info!(booking_id = id, by = claims.user_id, "Booking cancelled");

        let mut details = BookingDetails::from(row);
        details.booking = cancelled;
        if let Err(e) = self
            .email
            .send_booking_cancellation(&details.user.email, &details)
            .await
        {
            tracing::warn!("Failed to send cancellation notice for {}: {}", id, e);
        }
        Ok(details)
    }
}

/// Status response for the booking's owner or an admin
pub fn status_view(
    claims: &UserClaims,
    row: BookingDetailsRow,
    now: DateTime<Utc>,
) -> AppResult<BookingStatusResponse> {
    claims.require_owner_or_admin(row.booking.user_id)?;
    let status_info = row.booking.timing_at(now);
    Ok(BookingStatusResponse {
        booking: row.into(),
        status_info,
    })
}

/// Validate a requested slot and compute its duration and price.
///
/// Duration is counted in whole hours, rounded up; the price is prorated by
/// the minute and rounded to cents.
pub fn quote(
    user_id: i32,
    court: &Court,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    now: DateTime<Utc>,
) -> AppResult<NewBooking> {
    if end_time <= start_time {
        return Err(AppError::Validation("End time must be after start time".to_string()));
    }
    if start_time <= now {
        return Err(AppError::Validation("Cannot book a slot in the past".to_string()));
    }

    let minutes = (end_time - start_time).num_minutes();
    if minutes < 1 {
        return Err(AppError::Validation("Booking must last at least one minute".to_string()));
    }
    let duration = i32::try_from((minutes + 59) / 60)
        .map_err(|_| AppError::Validation("Booking is too long".to_string()))?;

    let total_price = (court.price_per_hour * Decimal::from(minutes) / Decimal::from(60))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    Ok(NewBooking {
        user_id,
        court_id: court.id,
        start_time,
        end_time,
        booking_date: start_time.date_naive(),
        duration,
        total_price,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        booking::Booking,
        enums::{BookingStatus, PaymentStatus, Role},
    };
    use chrono::{Duration, NaiveDate, TimeZone};

    fn court(price: Decimal) -> Court {
        Court {
            id: 4,
            venue_id: 2,
            name: "Center".to_string(),
            court_type: Some("tennis".to_string()),
            price_per_hour: price,
            is_active: true,
            crea_date: Utc::now(),
            modif_date: None,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap()
    }

    #[test]
    fn test_quote_whole_hours() {
        let start = Utc.with_ymd_and_hms(2025, 3, 2, 23, 0, 0).unwrap();
        let booking = quote(1, &court(Decimal::new(30, 0)), start, start + Duration::hours(2), now()).unwrap();
        assert_eq!(booking.duration, 2);
        assert_eq!(booking.total_price, Decimal::new(6000, 2));
        assert_eq!(booking.booking_date, NaiveDate::from_ymd_opt(2025, 3, 2).unwrap());
        assert_eq!(booking.court_id, 4);
    }

    #[test]
    fn test_quote_partial_hour_rounds_duration_up_and_prorates_price() {
        let start = now() + Duration::days(1);
        let booking = quote(1, &court(Decimal::new(25, 0)), start, start + Duration::minutes(90), now()).unwrap();
        assert_eq!(booking.duration, 2);
        assert_eq!(booking.total_price, Decimal::new(3750, 2));
    }

    #[test]
    fn test_quote_price_rounded_to_cents() {
        let start = now() + Duration::days(1);
        let booking = quote(1, &court(Decimal::new(10, 0)), start, start + Duration::minutes(50), now()).unwrap();
        assert_eq!(booking.duration, 1);
        assert_eq!(booking.total_price, Decimal::new(833, 2));
    }

    #[test]
    fn test_quote_rejects_inverted_or_empty_interval() {
        let start = now() + Duration::days(1);
        let c = court(Decimal::new(10, 0));
        assert!(matches!(quote(1, &c, start, start, now()), Err(AppError::Validation(_))));
        assert!(matches!(
            quote(1, &c, start, start - Duration::hours(1), now()),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            quote(1, &c, start, start + Duration::seconds(30), now()),
            Err(AppError::Validation(_))
        ));
    }

    fn details_row(owner_id: i32, starts_in: Duration) -> BookingDetailsRow {
        let start_time = now() + starts_in;
        BookingDetailsRow {
            booking: Booking {
                id: 11,
                user_id: owner_id,
                court_id: 4,
                status: BookingStatus::Confirmed,
                payment_status: PaymentStatus::Pending,
                start_time,
                end_time: start_time + Duration::hours(1),
                booking_date: start_time.date_naive(),
                duration: 1,
                total_price: Decimal::new(3000, 2),
                crea_date: now(),
                modif_date: None,
            },
            court_name: "Center".to_string(),
            court_type: Some("tennis".to_string()),
            venue_id: 2,
            venue_name: "Smash Arena".to_string(),
            venue_address: None,
            venue_owner_id: 9,
            user_full_name: "Ada".to_string(),
            user_email: "ada@example.com".to_string(),
        }
    }

    fn claims(user_id: i32, role: Role) -> UserClaims {
        UserClaims {
            sub: format!("user{}@example.com", user_id),
            user_id,
            role,
            exp: now().timestamp() + 3600,
            iat: now().timestamp(),
        }
    }

    #[test]
    fn test_status_view_for_owner() {
        let view = status_view(&claims(3, Role::User), details_row(3, Duration::hours(5)), now()).unwrap();
        assert_eq!(view.booking.booking.id, 11);
        assert_eq!(view.booking.court.venue.name, "Smash Arena");
        assert!(view.status_info.is_upcoming);
        assert!(view.status_info.can_cancel);
        assert!((view.status_info.hours_until_booking - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_status_view_for_admin() {
        let view = status_view(&claims(1, Role::Admin), details_row(3, Duration::hours(1)), now()).unwrap();
        assert!(!view.status_info.can_cancel);
    }

    #[test]
    fn test_status_view_denied_to_other_users() {
        // Owning the venue does not grant access to its bookings
        for caller in [claims(4, Role::User), claims(9, Role::FacilityOwner)] {
            let result = status_view(&caller, details_row(3, Duration::hours(5)), now());
            assert!(matches!(result, Err(AppError::Authorization(_))));
        }
    }

    #[test]
    fn test_quote_rejects_past_start() {
        let start = now() - Duration::minutes(1);
        let result = quote(1, &court(Decimal::new(10, 0)), start, start + Duration::hours(1), now());
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
