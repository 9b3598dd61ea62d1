//! Venues, courts and reviews repository

use std::collections::HashMap;

use sqlx::{types::Json, Pool, Postgres, QueryBuilder};

use super::{conflict_on_unique, like_pattern};
use crate::{
    error::{AppError, AppResult},
    models::{
        enums::ApprovalStatus,
        pagination::Pagination,
        venue::{
            Court, CreateCourt, CreateReview, CreateVenue, RatingStats, Review, UpdateCourt,
            UpdateVenue, Venue, VenueRow,
        },
    },
};

/// Upper bound on venues loaded for one public listing request
pub const MAX_LISTING_CANDIDATES: i64 = 500;

fn listed_query(search: Option<&str>, sport: Option<&str>) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::<Postgres>::new("SELECT * FROM venues WHERE is_active AND approval_status = ");
    builder.push_bind(ApprovalStatus::Approved);

    // Necessary conditions only; Rust trims more whitespace than btrim does
    builder.push(
        r#"
         AND char_length(btrim(name)) >= 2
         AND char_length(btrim(address)) >= 10
         AND char_length(btrim(description)) >= 10
         AND cardinality(photo_urls) > 0
         AND cardinality(sports) > 0
         AND cardinality(amenities) > 0
         AND operating_hours IS NOT NULL
         AND EXISTS (
             SELECT 1 FROM courts c
             WHERE c.venue_id = venues.id AND c.is_active AND c.price_per_hour > 0
               AND btrim(c.name) <> '' AND btrim(c.court_type) <> ''
         )"#,
    );

    if let Some(search) = search.filter(|s| !s.trim().is_empty()) {
        let pattern = like_pattern(search);
        builder
            .push(" AND (name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR address ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR city ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(sport) = sport.filter(|s| !s.trim().is_empty()) {
        builder
            .push(" AND EXISTS (SELECT 1 FROM unnest(sports) s WHERE LOWER(s) = LOWER(")
            .push_bind(sport.trim().to_string())
            .push("))");
    }
    builder.push(" ORDER BY crea_date DESC, id DESC LIMIT ");
    builder.push_bind(MAX_LISTING_CANDIDATES);
    builder
}

#[derive(Clone)]
pub struct VenuesRepository {
    pool: Pool<Postgres>,
}

impl VenuesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Load the courts of the given venues and attach them, keeping row order
    async fn attach_courts(&self, rows: Vec<VenueRow>) -> AppResult<Vec<Venue>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
        let courts = sqlx::query_as::<_, Court>(
            "SELECT * FROM courts WHERE venue_id = ANY($1) ORDER BY venue_id, id",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_venue: HashMap<i32, Vec<Court>> = HashMap::new();
        for court in courts {
            by_venue.entry(court.venue_id).or_default().push(court);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let courts = by_venue.remove(&row.id).unwrap_or_default();
                row.with_courts(courts)
            })
            .collect())
    }

    /// Get venue with its courts
    pub async fn get(&self, id: i32) -> AppResult<Venue> {
        let row = sqlx::query_as::<_, VenueRow>("SELECT * FROM venues WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Venue with id {} not found", id)))?;
        let mut venues = self.attach_courts(vec![row]).await?;
        venues
            .pop()
            .ok_or_else(|| AppError::Internal("Venue vanished while loading courts".to_string()))
    }

    /// Approved and active venues matching the public filters, newest first.
    ///
    /// Rows that cannot pass the completeness checks are dropped in SQL and at
    /// most `MAX_LISTING_CANDIDATES` are loaded; the caller still runs the
    /// full checks on what comes back.
    pub async fn list_listed(&self, search: Option<&str>, sport: Option<&str>) -> AppResult<Vec<Venue>> {
        let rows = listed_query(search, sport)
            .build_query_as::<VenueRow>()
            .fetch_all(&self.pool)
            .await?;
        if rows.len() as i64 == MAX_LISTING_CANDIDATES {
            tracing::warn!(
                limit = MAX_LISTING_CANDIDATES,
                "Public venue listing truncated to the newest candidates"
            );
        }
        self.attach_courts(rows).await
    }

    pub async fn list_by_owner(&self, owner_id: i32) -> AppResult<Vec<Venue>> {
        let rows = sqlx::query_as::<_, VenueRow>(
            "SELECT * FROM venues WHERE owner_id = $1 ORDER BY crea_date DESC, id DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        self.attach_courts(rows).await
    }

    /// Venues for moderation, optionally filtered by approval status
    pub async fn list_for_review(
        &self,
        status: Option<ApprovalStatus>,
        page: Pagination,
    ) -> AppResult<(Vec<Venue>, i64)> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM venues WHERE ($1::TEXT IS NULL OR approval_status = $1)",
        )
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, VenueRow>(
            r#"
            SELECT * FROM venues
            WHERE ($1::TEXT IS NULL OR approval_status = $1)
            ORDER BY crea_date ASC, id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(status)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok((self.attach_courts(rows).await?, total))
    }

    /// Create a venue awaiting approval
    pub async fn create(&self, owner_id: i32, data: &CreateVenue) -> AppResult<Venue> {
        let row = sqlx::query_as::<_, VenueRow>(
            r#"
            INSERT INTO venues (owner_id, name, description, address, city, photo_urls,
                                sports, amenities, operating_hours, approval_status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(owner_id)
        .bind(data.name.trim())
        .bind(&data.description)
        .bind(&data.address)
        .bind(&data.city)
        .bind(&data.photo_urls)
        .bind(&data.sports)
        .bind(&data.amenities)
        .bind(data.operating_hours.clone().map(Json))
        .bind(ApprovalStatus::Pending)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.with_courts(Vec::new()))
    }

    /// Partial update. A rejected venue goes back to pending review.
    pub async fn update(&self, id: i32, data: &UpdateVenue) -> AppResult<Venue> {
        sqlx::query_scalar::<_, i32>(
            r#"
            UPDATE venues SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                address = COALESCE($4, address),
                city = COALESCE($5, city),
                photo_urls = COALESCE($6, photo_urls),
                sports = COALESCE($7, sports),
                amenities = COALESCE($8, amenities),
                operating_hours = COALESCE($9, operating_hours),
                is_active = COALESCE($10, is_active),
                approval_status = CASE WHEN approval_status = 'REJECTED' THEN 'PENDING' ELSE approval_status END,
                rejection_reason = CASE WHEN approval_status = 'REJECTED' THEN NULL ELSE rejection_reason END,
                modif_date = NOW()
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(data.name.as_deref().map(str::trim))
        .bind(&data.description)
        .bind(&data.address)
        .bind(&data.city)
        .bind(&data.photo_urls)
        .bind(&data.sports)
        .bind(&data.amenities)
        .bind(data.operating_hours.clone().map(Json))
        .bind(data.is_active)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Venue with id {} not found", id)))?;

        self.get(id).await
    }

    pub async fn set_approval(
        &self,
        id: i32,
        status: ApprovalStatus,
        reason: Option<&str>,
    ) -> AppResult<Venue> {
        let updated = sqlx::query(
            r#"
            UPDATE venues SET approval_status = $2, rejection_reason = $3, modif_date = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(reason)
        .execute(&self.pool)
        .await?;
        if updated.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Venue with id {} not found", id)));
        }
        self.get(id).await
    }

    pub async fn count_by_approval(&self) -> AppResult<Vec<(ApprovalStatus, i64)>> {
        let rows = sqlx::query_as::<_, (ApprovalStatus, i64)>(
            "SELECT approval_status, COUNT(*) FROM venues GROUP BY approval_status ORDER BY approval_status",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // ---- Courts ----

    pub async fn get_court(&self, id: i32) -> AppResult<Court> {
        sqlx::query_as::<_, Court>("SELECT * FROM courts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Court with id {} not found", id)))
    }

    pub async fn create_court(&self, venue_id: i32, data: &CreateCourt) -> AppResult<Court> {
        let court = sqlx::query_as::<_, Court>(
            r#"
            INSERT INTO courts (venue_id, name, court_type, price_per_hour, is_active)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(venue_id)
        .bind(data.name.trim())
        .bind(&data.court_type)
        .bind(data.price_per_hour)
        .bind(data.is_active.unwrap_or(true))
        .fetch_one(&self.pool)
        .await?;
        Ok(court)
    }

    pub async fn update_court(&self, id: i32, data: &UpdateCourt) -> AppResult<Court> {
        sqlx::query_as::<_, Court>(
            r#"
            UPDATE courts SET
                name = COALESCE($2, name),
                court_type = COALESCE($3, court_type),
                price_per_hour = COALESCE($4, price_per_hour),
                is_active = COALESCE($5, is_active),
                modif_date = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(data.name.as_deref().map(str::trim))
        .bind(&data.court_type)
        .bind(data.price_per_hour)
        .bind(data.is_active)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Court with id {} not found", id)))
    }

    // ---- Reviews ----

    /// Average rating and count per venue; venues without reviews are absent
    pub async fn rating_stats(&self, venue_ids: &[i32]) -> AppResult<HashMap<i32, RatingStats>> {
        if venue_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = sqlx::query_as::<_, RatingStats>(
            r#"
            SELECT venue_id, AVG(rating)::float8 AS average_rating, COUNT(*) AS review_count
            FROM reviews
            WHERE venue_id = ANY($1)
            GROUP BY venue_id
            "#,
        )
        .bind(venue_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|r| (r.venue_id, r)).collect())
    }

    pub async fn create_review(&self, venue_id: i32, user_id: i32, data: &CreateReview) -> AppResult<Review> {
        sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (venue_id, user_id, rating, comment)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(venue_id)
        .bind(user_id)
        .bind(data.rating)
        .bind(&data.comment)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "You have already reviewed this venue"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listed_query_prefilters_and_caps() {
        let builder = listed_query(None, None);
        let sql = builder.sql();
        assert!(sql.contains("cardinality(photo_urls) > 0"));
        assert!(sql.contains("operating_hours IS NOT NULL"));
        assert!(sql.contains("c.is_active AND c.price_per_hour > 0"));
        assert!(sql.trim_end().ends_with("LIMIT $2"));
    }

    #[test]
    fn test_listed_query_filters_bind_in_order() {
        let builder = listed_query(Some("arena"), Some(" Tennis "));
        let sql = builder.sql();
        assert!(sql.contains("name ILIKE $2 OR address ILIKE $3 OR city ILIKE $4"));
        assert!(sql.contains("LOWER(s) = LOWER($5)"));
        assert!(sql.trim_end().ends_with("LIMIT $6"));
    }

    #[test]
    fn test_blank_filters_are_ignored() {
        let builder = listed_query(Some("  "), Some(""));
        assert!(!builder.sql().contains("ILIKE"));
        assert!(!builder.sql().contains("unnest"));
    }
}
