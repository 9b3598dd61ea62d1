//! Venue, court and review models

use chrono::{DateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use super::enums::ApprovalStatus;
use crate::rules::venue_completeness::ValidationDetails;

// ---------------------------------------------------------------------------
// Operating hours
// ---------------------------------------------------------------------------

/// Opening state of a single weekday
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DayHours {
    #[serde(default)]
    pub is_open: bool,
    /// Opening time (HH:MM)
    pub open_time: Option<String>,
    /// Closing time (HH:MM)
    pub close_time: Option<String>,
}

impl DayHours {
    pub fn open(open_time: &str, close_time: &str) -> Self {
        Self {
            is_open: true,
            open_time: Some(open_time.to_string()),
            close_time: Some(close_time.to_string()),
        }
    }
}

/// Weekly operating hours keyed by weekday name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct OperatingHours {
    pub monday: DayHours,
    pub tuesday: DayHours,
    pub wednesday: DayHours,
    pub thursday: DayHours,
    pub friday: DayHours,
    pub saturday: DayHours,
    pub sunday: DayHours,
}

impl OperatingHours {
    pub fn days(&self) -> [(&'static str, &DayHours); 7] {
        [
            ("monday", &self.monday),
            ("tuesday", &self.tuesday),
            ("wednesday", &self.wednesday),
            ("thursday", &self.thursday),
            ("friday", &self.friday),
            ("saturday", &self.saturday),
            ("sunday", &self.sunday),
        ]
    }
}

fn validate_operating_hours(hours: &OperatingHours) -> Result<(), ValidationError> {
    for (day, entry) in hours.days() {
        for time in [&entry.open_time, &entry.close_time].into_iter().flatten() {
            if NaiveTime::parse_from_str(time.trim(), "%H:%M").is_err() {
                let mut err = ValidationError::new("invalid_time");
                err.message = Some(format!("Invalid time '{}' for {} (use HH:MM)", time, day).into());
                return Err(err);
            }
        }
    }
    Ok(())
}

fn validate_positive_price(price: &Decimal) -> Result<(), ValidationError> {
    if *price > Decimal::ZERO {
        Ok(())
    } else {
        let mut err = ValidationError::new("non_positive_price");
        err.message = Some("Price per hour must be positive".into());
        Err(err)
    }
}

// ---------------------------------------------------------------------------
// Court
// ---------------------------------------------------------------------------

/// A bookable unit within a venue
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Court {
    pub id: i32,
    pub venue_id: i32,
    pub name: String,
    /// Surface / sport type, e.g. "badminton", "clay"
    pub court_type: Option<String>,
    #[schema(value_type = String)]
    pub price_per_hour: Decimal,
    pub is_active: bool,
    pub crea_date: DateTime<Utc>,
    pub modif_date: Option<DateTime<Utc>>,
}

/// Create court request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCourt {
    #[validate(length(min = 1, max = 80, message = "Court name must be 1-80 characters"))]
    pub name: String,
    pub court_type: Option<String>,
    #[schema(value_type = String)]
    #[validate(custom(function = "validate_positive_price"))]
    pub price_per_hour: Decimal,
    pub is_active: Option<bool>,
}

/// Update court request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCourt {
    #[validate(length(min = 1, max = 80, message = "Court name must be 1-80 characters"))]
    pub name: Option<String>,
    pub court_type: Option<String>,
    #[schema(value_type = Option<String>)]
    #[validate(custom(function = "validate_positive_price"))]
    pub price_per_hour: Option<Decimal>,
    pub is_active: Option<bool>,
}

// ---------------------------------------------------------------------------
// Venue
// ---------------------------------------------------------------------------

/// Venue row as stored (courts live in their own table)
#[derive(Debug, Clone, FromRow)]
pub struct VenueRow {
    pub id: i32,
    pub owner_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub photo_urls: Vec<String>,
    pub sports: Vec<String>,
    pub amenities: Vec<String>,
    pub operating_hours: Option<Json<OperatingHours>>,
    pub is_active: bool,
    pub approval_status: ApprovalStatus,
    pub rejection_reason: Option<String>,
    pub crea_date: DateTime<Utc>,
    pub modif_date: Option<DateTime<Utc>>,
}

impl VenueRow {
    pub fn with_courts(self, courts: Vec<Court>) -> Venue {
        Venue {
            id: self.id,
            owner_id: self.owner_id,
            name: self.name,
            description: self.description,
            address: self.address,
            city: self.city,
            photo_urls: self.photo_urls,
            sports: self.sports,
            amenities: self.amenities,
            operating_hours: self.operating_hours.map(|Json(hours)| hours),
            is_active: self.is_active,
            approval_status: self.approval_status,
            rejection_reason: self.rejection_reason,
            crea_date: self.crea_date,
            modif_date: self.modif_date,
            courts,
        }
    }
}

/// Venue with its courts
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Venue {
    pub id: i32,
    pub owner_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub photo_urls: Vec<String>,
    pub sports: Vec<String>,
    pub amenities: Vec<String>,
    pub operating_hours: Option<OperatingHours>,
    pub is_active: bool,
    pub approval_status: ApprovalStatus,
    pub rejection_reason: Option<String>,
    pub crea_date: DateTime<Utc>,
    pub modif_date: Option<DateTime<Utc>>,
    pub courts: Vec<Court>,
}

/// Create venue request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateVenue {
    #[validate(length(min = 1, max = 120, message = "Venue name must be 1-120 characters"))]
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    #[serde(default)]
    pub photo_urls: Vec<String>,
    #[serde(default)]
    pub sports: Vec<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[validate(custom(function = "validate_operating_hours"))]
    pub operating_hours: Option<OperatingHours>,
}

/// Update venue request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateVenue {
    #[validate(length(min = 1, max = 120, message = "Venue name must be 1-120 characters"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub photo_urls: Option<Vec<String>>,
    pub sports: Option<Vec<String>>,
    pub amenities: Option<Vec<String>>,
    #[validate(custom(function = "validate_operating_hours"))]
    pub operating_hours: Option<OperatingHours>,
    pub is_active: Option<bool>,
}

/// Public venue search parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct VenueQuery {
    /// Matches name, address or city
    pub search: Option<String>,
    /// Sport identifier the venue must offer
    pub sport: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Admin venue listing parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct AdminVenueQuery {
    pub approval_status: Option<ApprovalStatus>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Reject venue request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RejectVenue {
    #[validate(length(min = 5, max = 500, message = "Reason must be 5-500 characters"))]
    pub reason: String,
}

/// Lowest and highest hourly price of a venue's bookable courts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct PriceRange {
    #[schema(value_type = String)]
    pub min: Decimal,
    #[schema(value_type = String)]
    pub max: Decimal,
}

/// Venue card for public listings
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VenueSummary {
    pub id: i32,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub cover_photo: Option<String>,
    pub sports: Vec<String>,
    pub price_range: Option<PriceRange>,
    pub average_rating: Option<f64>,
    pub review_count: i64,
}

/// Public venue page
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VenueDetails {
    #[serde(flatten)]
    pub venue: Venue,
    pub price_range: Option<PriceRange>,
    pub average_rating: Option<f64>,
    pub review_count: i64,
}

/// Venue as seen by its owner or a moderator, with the listing checklist
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VenueWithValidation {
    #[serde(flatten)]
    pub venue: Venue,
    pub validation: ValidationDetails,
}

// ---------------------------------------------------------------------------
// Review
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Review {
    pub id: i32,
    pub venue_id: i32,
    pub user_id: i32,
    pub rating: i16,
    pub comment: Option<String>,
    pub crea_date: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReview {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i16,
    #[validate(length(max = 1000, message = "Comment must be at most 1000 characters"))]
    pub comment: Option<String>,
}

/// Average rating and review count of one venue
#[derive(Debug, Clone, Copy, Default, FromRow)]
pub struct RatingStats {
    pub venue_id: i32,
    pub average_rating: Option<f64>,
    pub review_count: i64,
}
