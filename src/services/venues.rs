//! Venue listing, owner management and reviews

use std::collections::HashMap;

use crate::{
    error::{AppError, AppResult},
    models::{
        pagination::{PaginatedResponse, Pagination},
        user::UserClaims,
        venue::{
            Court, CreateCourt, CreateReview, CreateVenue, RatingStats, Review, UpdateCourt,
            UpdateVenue, Venue, VenueDetails, VenueQuery, VenueSummary, VenueWithValidation,
        },
    },
    repository::Repository,
    rules::{
        listing::{price_range, round_rating},
        venue_completeness::{filter_complete, is_complete, validation_details},
    },
};

#[derive(Clone)]
pub struct VenuesService {
    repository: Repository,
}

impl VenuesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Public listing: only complete venues are returned
    pub async fn list_public(&self, query: &VenueQuery) -> AppResult<PaginatedResponse<VenueSummary>> {
        let page = Pagination::new(query.page, query.per_page);
        let candidates = self
            .repository
            .venues
            .list_listed(query.search.as_deref(), query.sport.as_deref())
            .await?;
        let fetched = candidates.len();

        let complete = filter_complete(candidates);
        tracing::debug!(fetched, listed = complete.len(), "Filtered venue listing");

        let total = complete.len() as i64;
        let venues = page.slice(complete);
        let ids: Vec<i32> = venues.iter().map(|v| v.id).collect();
        let ratings = self.repository.venues.rating_stats(&ids).await?;

        let items = venues
            .into_iter()
            .map(|venue| summarize(venue, &ratings))
            .collect();
        Ok(page.respond(items, total))
    }

    /// Public venue page; incomplete venues are reported as missing
    pub async fn get_public(&self, id: i32) -> AppResult<VenueDetails> {
        let mut venue = self.listed_venue(id).await?;
        let stats = self
            .repository
            .venues
            .rating_stats(&[id])
            .await?
            .remove(&id)
            .unwrap_or_default();

        venue.courts.retain(|c| c.is_active);
        Ok(VenueDetails {
            price_range: price_range(&venue.courts),
            average_rating: round_rating(stats.average_rating),
            review_count: stats.review_count,
            venue,
        })
    }

    pub async fn create_review(&self, claims: &UserClaims, venue_id: i32, review: CreateReview) -> AppResult<Review> {
        self.listed_venue(venue_id).await?;
        let created = self
            .repository
            .venues
            .create_review(venue_id, claims.user_id, &review)
            .await?;
        tracing::info!(venue_id, user_id = claims.user_id, rating = created.rating, "Review added");
        Ok(created)
    }

    // ---- Owner ----

    pub async fn list_owned(&self, claims: &UserClaims) -> AppResult<Vec<VenueWithValidation>> {
        claims.require_facility_owner()?;
        let venues = self.repository.venues.list_by_owner(claims.user_id).await?;
        Ok(venues.into_iter().map(with_validation).collect())
    }

    pub async fn get_owned(&self, claims: &UserClaims, id: i32) -> AppResult<VenueWithValidation> {
        let venue = self.owned_venue(claims, id).await?;
        Ok(with_validation(venue))
    }

    pub async fn create(&self, claims: &UserClaims, venue: CreateVenue) -> AppResult<VenueWithValidation> {
        claims.require_facility_owner()?;
        let created = self.repository.venues.create(claims.user_id, &venue).await?;
        tracing::info!(venue_id = created.id, owner_id = claims.user_id, "Venue created, pending approval");
        Ok(with_validation(created))
    }

    pub async fn update(&self, claims: &UserClaims, id: i32, venue: UpdateVenue) -> AppResult<VenueWithValidation> {
        let current = self.owned_venue(claims, id).await?;
        let updated = self.repository.venues.update(id, &venue).await?;
        if current.approval_status != updated.approval_status {
            tracing::info!(venue_id = id, "Rejected venue edited, back to {}", updated.approval_status);
        }
        Ok(with_validation(updated))
    }

    pub async fn create_court(&self, claims: &UserClaims, venue_id: i32, court: CreateCourt) -> AppResult<Court> {
        self.owned_venue(claims, venue_id).await?;
        let created = self.repository.venues.create_court(venue_id, &court).await?;
        tracing::info!(venue_id, court_id = created.id, "Court added");
        Ok(created)
    }

    pub async fn update_court(&self, claims: &UserClaims, court_id: i32, court: UpdateCourt) -> AppResult<Court> {
        let current = self.repository.venues.get_court(court_id).await?;
        self.owned_venue(claims, current.venue_id).await?;
        self.repository.venues.update_court(court_id, &court).await
    }

    async fn listed_venue(&self, id: i32) -> AppResult<Venue> {
        let venue = self.repository.venues.get(id).await?;
        if !is_complete(&venue) {
            return Err(AppError::NotFound(format!("Venue with id {} not found", id)));
        }
        Ok(venue)
    }

    async fn owned_venue(&self, claims: &UserClaims, id: i32) -> AppResult<Venue> {
        claims.require_facility_owner()?;
        let venue = self.repository.venues.get(id).await?;
        claims.require_owner_or_admin(venue.owner_id)?;
        Ok(venue)
    }
}

fn with_validation(venue: Venue) -> VenueWithValidation {
    VenueWithValidation {
        validation: validation_details(&venue),
        venue,
    }
}

fn summarize(venue: Venue, ratings: &HashMap<i32, RatingStats>) -> VenueSummary {
    let stats = ratings.get(&venue.id).copied().unwrap_or_default();
    VenueSummary {
        price_range: price_range(&venue.courts),
        average_rating: round_rating(stats.average_rating),
        review_count: stats.review_count,
        cover_photo: venue.photo_urls.first().cloned(),
        id: venue.id,
        name: venue.name,
        address: venue.address,
        city: venue.city,
        sports: venue.sports,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::ApprovalStatus;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn venue() -> Venue {
        Venue {
            id: 3,
            owner_id: 1,
            name: "Riverside Arena".to_string(),
            description: None,
            address: Some("1 River Road".to_string()),
            city: Some("Lyon".to_string()),
            photo_urls: vec!["https://img/1.jpg".to_string(), "https://img/2.jpg".to_string()],
            sports: vec!["padel".to_string()],
            amenities: Vec::new(),
            operating_hours: None,
            is_active: true,
            approval_status: ApprovalStatus::Approved,
            rejection_reason: None,
            crea_date: Utc::now(),
            modif_date: None,
            courts: vec![Court {
                id: 9,
                venue_id: 3,
                name: "P1".to_string(),
                court_type: None,
                price_per_hour: Decimal::new(2500, 2),
                is_active: true,
                crea_date: Utc::now(),
                modif_date: None,
            }],
        }
    }

    #[test]
    fn test_summary_uses_first_photo_and_rounded_rating() {
        let mut ratings = HashMap::new();
        ratings.insert(
            3,
            RatingStats { venue_id: 3, average_rating: Some(4.26), review_count: 4 },
        );
        let summary = summarize(venue(), &ratings);
        assert_eq!(summary.cover_photo.as_deref(), Some("https://img/1.jpg"));
        assert_eq!(summary.average_rating, Some(4.3));
        assert_eq!(summary.review_count, 4);
        let range = summary.price_range.unwrap();
        assert_eq!(range.min, Decimal::new(25, 0));
        assert_eq!(range.max, Decimal::new(25, 0));
    }

    #[test]
    fn test_summary_without_reviews() {
        let summary = summarize(venue(), &HashMap::new());
        assert_eq!(summary.average_rating, None);
        assert_eq!(summary.review_count, 0);
    }

    #[test]
    fn test_with_validation_reports_missing_fields() {
        let v = with_validation(venue());
        assert!(!v.validation.is_complete);
        assert!(!v.validation.has_description);
        assert!(v.validation.has_photos);
    }
}
