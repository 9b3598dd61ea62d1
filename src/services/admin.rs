//! Moderation of users and venues

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::{ApprovalStatus, BookingStatus, Role, UserStatus},
        pagination::{PaginatedResponse, Pagination},
        stats::{AdminStats, Breakdown},
        user::{User, UserClaims, UserQuery},
        venue::{AdminVenueQuery, VenueWithValidation},
    },
    repository::Repository,
    rules::venue_completeness::{validation_details, ValidationDetails},
};

#[derive(Clone)]
pub struct AdminService {
    repository: Repository,
}

impl AdminService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn search_users(&self, query: &UserQuery) -> AppResult<PaginatedResponse<User>> {
        let page = Pagination::new(query.page, query.per_page);
        let (users, total) = self.repository.users.search(query, page).await?;
        Ok(page.respond(users, total))
    }

    /// Ban or reinstate a user. Admin accounts cannot be banned.
    pub async fn set_user_status(&self, claims: &UserClaims, user_id: i32, status: UserStatus) -> AppResult<User> {
        if status == UserStatus::Banned {
            if user_id == claims.user_id {
                return Err(AppError::BusinessRule("You cannot ban yourself".to_string()));
            }
            let target = self.repository.users.get_by_id(user_id).await?;
            if target.role == Role::Admin {
                return Err(AppError::BusinessRule("Administrators cannot be banned".to_string()));
            }
        }

        let user = self.repository.users.set_status(user_id, status).await?;
        tracing::info!(user_id, admin_id = claims.user_id, %status, "User status changed");
        Ok(user)
    }

    pub async fn list_venues(&self, query: &AdminVenueQuery) -> AppResult<PaginatedResponse<VenueWithValidation>> {
        let page = Pagination::new(query.page, query.per_page);
        let (venues, total) = self
            .repository
            .venues
            .list_for_review(query.approval_status, page)
            .await?;
        let items = venues
            .into_iter()
            .map(|venue| VenueWithValidation {
                validation: validation_details(&venue),
                venue,
            })
            .collect();
        Ok(page.respond(items, total))
    }

    pub async fn venue_validation(&self, venue_id: i32) -> AppResult<ValidationDetails> {
        let venue = self.repository.venues.get(venue_id).await?;
        Ok(validation_details(&venue))
    }

    pub async fn approve_venue(&self, claims: &UserClaims, venue_id: i32) -> AppResult<VenueWithValidation> {
        let venue = self
            .repository
            .venues
            .set_approval(venue_id, ApprovalStatus::Approved, None)
            .await?;
        let validation = validation_details(&venue);
        tracing::info!(
            venue_id,
            admin_id = claims.user_id,
            listed = validation.is_complete,
            "Venue approved"
        );
        Ok(VenueWithValidation { venue, validation })
    }

    pub async fn reject_venue(&self, claims: &UserClaims, venue_id: i32, reason: &str) -> AppResult<VenueWithValidation> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(AppError::Validation("Rejection reason is required".to_string()));
        }
        let venue = self
            .repository
            .venues
            .set_approval(venue_id, ApprovalStatus::Rejected, Some(reason))
            .await?;
        tracing::info!(venue_id, admin_id = claims.user_id, "Venue rejected");
        Ok(VenueWithValidation {
            validation: validation_details(&venue),
            venue,
        })
    }

    pub async fn stats(&self) -> AppResult<AdminStats> {
        let users = self.repository.users.count_by_role().await?;
        let venues = self.repository.venues.count_by_approval().await?;
        let bookings = self.repository.bookings.count_by_status().await?;

        Ok(AdminStats {
            users: Breakdown::from_counts(Role::ALL, users),
            venues: Breakdown::from_counts(ApprovalStatus::ALL, venues),
            bookings: Breakdown::from_counts(BookingStatus::ALL, bookings),
        })
    }
}
