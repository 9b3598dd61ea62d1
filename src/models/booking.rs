//! Booking model and related types

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use super::enums::{BookingStatus, PaymentStatus};
use super::user::UserShort;
use crate::error::AppError;
use crate::rules::booking_status::{booking_timing, BookingTiming};

/// Booking model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Booking {
    pub id: i32,
    pub user_id: i32,
    pub court_id: i32,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub booking_date: NaiveDate,
    /// Duration in whole hours
    pub duration: i32,
    #[schema(value_type = String)]
    pub total_price: Decimal,
    pub crea_date: DateTime<Utc>,
    pub modif_date: Option<DateTime<Utc>>,
}

impl Booking {
    /// Temporal state relative to `now`; always recomputed, never stored
    pub fn timing_at(&self, now: DateTime<Utc>) -> BookingTiming {
        booking_timing(self.start_time, self.end_time, self.status, now)
    }

    /// Whether the booking may still be cancelled at `now`
    pub fn ensure_cancellable(&self, now: DateTime<Utc>) -> Result<(), AppError> {
        if self.status == BookingStatus::Cancelled {
            return Err(AppError::BusinessRule("Booking is already cancelled".to_string()));
        }
        if !self.timing_at(now).can_cancel {
            return Err(AppError::BusinessRule(
                "Booking can no longer be cancelled".to_string(),
            ));
        }
        Ok(())
    }
}

/// Booking joined with its court, venue and user, as fetched for display
#[derive(Debug, Clone, FromRow)]
pub struct BookingDetailsRow {
    #[sqlx(flatten)]
    pub booking: Booking,
    pub court_name: String,
    pub court_type: Option<String>,
    pub venue_id: i32,
    pub venue_name: String,
    pub venue_address: Option<String>,
    pub venue_owner_id: i32,
    pub user_full_name: String,
    pub user_email: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookingVenue {
    pub id: i32,
    pub name: String,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookingCourt {
    pub id: i32,
    pub name: String,
    pub court_type: Option<String>,
    pub venue: BookingVenue,
}

/// Booking with its relations, for display
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookingDetails {
    #[serde(flatten)]
    pub booking: Booking,
    pub court: BookingCourt,
    pub user: UserShort,
}

impl From<BookingDetailsRow> for BookingDetails {
    fn from(row: BookingDetailsRow) -> Self {
        let court = BookingCourt {
            id: row.booking.court_id,
            name: row.court_name,
            court_type: row.court_type,
            venue: BookingVenue {
                id: row.venue_id,
                name: row.venue_name,
                address: row.venue_address,
            },
        };
        let user = UserShort {
            id: row.booking.user_id,
            full_name: row.user_full_name,
            email: row.user_email,
        };
        BookingDetails { booking: row.booking, court, user }
    }
}

/// Booking status endpoint response
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookingStatusResponse {
    pub booking: BookingDetails,
    pub status_info: BookingTiming,
}

/// Create booking request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBooking {
    pub court_id: i32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// Booking list parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct BookingQuery {
    pub status: Option<BookingStatus>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Values computed for a new booking before it is inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    pub user_id: i32,
    pub court_id: i32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub booking_date: NaiveDate,
    pub duration: i32,
    pub total_price: Decimal,
}
