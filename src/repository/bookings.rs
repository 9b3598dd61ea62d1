//! Bookings repository for database operations

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        booking::{Booking, BookingDetailsRow, NewBooking},
        enums::{BookingStatus, PaymentStatus},
        pagination::Pagination,
    },
};

const DETAILS_SELECT: &str = r#"
    SELECT b.*,
           c.name AS court_name, c.court_type,
           v.id AS venue_id, v.name AS venue_name, v.address AS venue_address,
           v.owner_id AS venue_owner_id,
           u.full_name AS user_full_name, u.email AS user_email
    FROM bookings b
    JOIN courts c ON b.court_id = c.id
    JOIN venues v ON c.venue_id = v.id
    JOIN users u ON b.user_id = u.id
"#;

#[derive(Clone)]
pub struct BookingsRepository {
    pool: Pool<Postgres>,
}

impl BookingsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get booking joined with court, venue and user
    pub async fn get_details(&self, id: i32) -> AppResult<BookingDetailsRow> {
        sqlx::query_as::<_, BookingDetailsRow>(&format!("{} WHERE b.id = $1", DETAILS_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Booking with id {} not found", id)))
    }

    /// Bookings of a user, most recent start first
    pub async fn list_for_user(
        &self,
        user_id: i32,
        status: Option<BookingStatus>,
        page: Pagination,
    ) -> AppResult<(Vec<BookingDetailsRow>, i64)> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM bookings WHERE user_id = $1 AND ($2::TEXT IS NULL OR status = $2)",
        )
        .bind(user_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, BookingDetailsRow>(&format!(
            "{} WHERE b.user_id = $1 AND ($2::TEXT IS NULL OR b.status = $2) \
             ORDER BY b.start_time DESC, b.id DESC LIMIT $3 OFFSET $4",
            DETAILS_SELECT
        ))
        .bind(user_id)
        .bind(status)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok((rows, total))
    }

    /// Insert a booking unless it overlaps a live booking on the same court.
    ///
    /// The court row is locked for the duration of the transaction so two
    /// concurrent requests for the same slot cannot both succeed.
    pub async fn create_if_free(&self, booking: &NewBooking) -> AppResult<Booking> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT id FROM courts WHERE id = $1 FOR UPDATE")
            .bind(booking.court_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Court with id {} not found", booking.court_id)))?;

        let overlaps: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM bookings
                WHERE court_id = $1 AND status <> $2
                  AND start_time < $4 AND end_time > $3
            )
            "#,
        )
        .bind(booking.court_id)
        .bind(BookingStatus::Cancelled)
        .bind(booking.start_time)
        .bind(booking.end_time)
        .fetch_one(&mut *tx)
        .await?;

        if overlaps {
            return Err(AppError::Conflict(
                "Court is already booked for this time".to_string(),
            ));
        }

        let created = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (user_id, court_id, status, payment_status, start_time,
                                  end_time, booking_date, duration, total_price)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(booking.user_id)
        .bind(booking.court_id)
        .bind(BookingStatus::Confirmed)
        .bind(PaymentStatus::Pending)
        .bind(booking.start_time)
        .bind(booking.end_time)
        .bind(booking.booking_date)
        .bind(booking.duration)
        .bind(booking.total_price)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(created)
    }

    /// Mark a booking cancelled; paid bookings become refunded.
    ///
    /// The booking row is locked and re-checked with `ensure_cancellable`
    /// inside the transaction, so concurrent cancels cannot both succeed.
    pub async fn cancel(&self, id: i32, now: DateTime<Utc>) -> AppResult<Booking> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Booking with id {} not found", id)))?;
        current.ensure_cancellable(now)?;

        let cancelled = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings SET
                status = $2,
                payment_status = CASE WHEN payment_status = $3 THEN $4 ELSE payment_status END,
                modif_date = NOW()
            WHERE id = $1 AND status <> $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(BookingStatus::Cancelled)
        .bind(PaymentStatus::Paid)
        .bind(PaymentStatus::Refunded)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::BusinessRule("Booking is already cancelled".to_string()))?;

        tx.commit().await?;
        Ok(cancelled)
    }

    pub async fn count_by_status(&self) -> AppResult<Vec<(BookingStatus, i64)>> {
        let rows = sqlx::query_as::<_, (BookingStatus, i64)>(
            "SELECT status, COUNT(*) FROM bookings GROUP BY status ORDER BY status",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
