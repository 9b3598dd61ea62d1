//! Checklist deciding whether a venue may be listed publicly.
//!
//! A venue is complete only when every [`CompletenessCheck`] passes. The
//! result is derived from the record on each call and never stored.

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{
    enums::ApprovalStatus,
    venue::{Court, Venue},
};

const MIN_NAME_LEN: usize = 2;
const MIN_ADDRESS_LEN: usize = 10;
const MIN_DESCRIPTION_LEN: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CompletenessCheck {
    HasName,
    HasAddress,
    HasDescription,
    HasPhotos,
    HasSports,
    HasAmenities,
    HasOperatingHours,
    HasOpenDay,
    HasCourts,
    HasActiveCourt,
    IsActive,
    IsApproved,
}

impl CompletenessCheck {
    pub const ALL: [CompletenessCheck; 12] = [
        CompletenessCheck::HasName,
        CompletenessCheck::HasAddress,
        CompletenessCheck::HasDescription,
        CompletenessCheck::HasPhotos,
        CompletenessCheck::HasSports,
        CompletenessCheck::HasAmenities,
        CompletenessCheck::HasOperatingHours,
        CompletenessCheck::HasOpenDay,
        CompletenessCheck::HasCourts,
        CompletenessCheck::HasActiveCourt,
        CompletenessCheck::IsActive,
        CompletenessCheck::IsApproved,
    ];

    pub fn passes(self, venue: &Venue) -> bool {
        match self {
            CompletenessCheck::HasName => trimmed_len_at_least(Some(&venue.name), MIN_NAME_LEN),
            CompletenessCheck::HasAddress => {
                trimmed_len_at_least(venue.address.as_deref(), MIN_ADDRESS_LEN)
            }
            CompletenessCheck::HasDescription => {
                trimmed_len_at_least(venue.description.as_deref(), MIN_DESCRIPTION_LEN)
            }
            CompletenessCheck::HasPhotos => !venue.photo_urls.is_empty(),
            CompletenessCheck::HasSports => !venue.sports.is_empty(),
            CompletenessCheck::HasAmenities => !venue.amenities.is_empty(),
            CompletenessCheck::HasOperatingHours => venue.operating_hours.is_some(),
            CompletenessCheck::HasOpenDay => venue.operating_hours.as_ref().is_some_and(|hours| {
                hours.days().iter().any(|(_, day)| {
                    day.is_open && is_set(day.open_time.as_deref()) && is_set(day.close_time.as_deref())
                })
            }),
            CompletenessCheck::HasCourts => !venue.courts.is_empty(),
            CompletenessCheck::HasActiveCourt => venue.courts.iter().any(is_usable_court),
            CompletenessCheck::IsActive => venue.is_active,
            CompletenessCheck::IsApproved => venue.approval_status == ApprovalStatus::Approved,
        }
    }
}

fn trimmed_len_at_least(value: Option<&str>, min: usize) -> bool {
    value.is_some_and(|v| v.trim().chars().count() >= min)
}

fn is_set(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

fn is_usable_court(court: &Court) -> bool {
    court.is_active
        && is_set(Some(&court.name))
        && is_set(court.court_type.as_deref())
        && court.price_per_hour > Decimal::ZERO
}

/// Outcome of every check, evaluated independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ValidationDetails {
    pub has_name: bool,
    pub has_address: bool,
    pub has_description: bool,
    pub has_photos: bool,
    pub has_sports: bool,
    pub has_amenities: bool,
    pub has_operating_hours: bool,
    pub has_open_day: bool,
    pub has_courts: bool,
    pub has_active_court: bool,
    pub is_active: bool,
    pub is_approved: bool,
    pub is_complete: bool,
    /// Checks that did not pass, in checklist order
    pub failed_checks: Vec<CompletenessCheck>,
}

/// True iff all checks pass; stops at the first failure.
pub fn is_complete(venue: &Venue) -> bool {
    CompletenessCheck::ALL.iter().all(|check| check.passes(venue))
}

/// Evaluate every check without short-circuiting.
pub fn validation_details(venue: &Venue) -> ValidationDetails {
    let results = CompletenessCheck::ALL.map(|check| (check, check.passes(venue)));
    let passed = |wanted: CompletenessCheck| {
        results
            .iter()
            .find(|(check, _)| *check == wanted)
            .is_some_and(|(_, ok)| *ok)
    };
    let failed_checks: Vec<CompletenessCheck> = results
        .iter()
        .filter(|(_, ok)| !ok)
        .map(|(check, _)| *check)
        .collect();

    ValidationDetails {
        has_name: passed(CompletenessCheck::HasName),
        has_address: passed(CompletenessCheck::HasAddress),
        has_description: passed(CompletenessCheck::HasDescription),
        has_photos: passed(CompletenessCheck::HasPhotos),
        has_sports: passed(CompletenessCheck::HasSports),
        has_amenities: passed(CompletenessCheck::HasAmenities),
        has_operating_hours: passed(CompletenessCheck::HasOperatingHours),
        has_open_day: passed(CompletenessCheck::HasOpenDay),
        has_courts: passed(CompletenessCheck::HasCourts),
        has_active_court: passed(CompletenessCheck::HasActiveCourt),
        is_active: passed(CompletenessCheck::IsActive),
        is_approved: passed(CompletenessCheck::IsApproved),
        is_complete: failed_checks.is_empty(),
        failed_checks,
    }
}

/// Keep complete venues, preserving order.
pub fn filter_complete<I>(venues: I) -> Vec<Venue>
where
    I: IntoIterator<Item = Venue>,
{
    venues.into_iter().filter(is_complete).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::venue::{DayHours, OperatingHours};
    use chrono::Utc;

    fn court(id: i32) -> Court {
        Court {
            id,
            venue_id: 1,
            name: format!("Court {}", id),
            court_type: Some("badminton".to_string()),
            price_per_hour: Decimal::new(2500, 2),
            is_active: true,
            crea_date: Utc::now(),
            modif_date: None,
        }
    }

    fn complete_venue(id: i32) -> Venue {
        Venue {
            id,
            owner_id: 1,
            name: "Smash Arena".to_string(),
            description: Some("Six indoor courts with pro lighting".to_string()),
            address: Some("12 Racket Street, Springfield".to_string()),
            city: Some("Springfield".to_string()),
            photo_urls: vec!["https://img.example/1.jpg".to_string()],
            sports: vec!["badminton".to_string()],
            amenities: vec!["parking".to_string()],
            operating_hours: Some(OperatingHours {
                monday: DayHours::open("08:00", "22:00"),
                ..Default::default()
            }),
            is_active: true,
            approval_status: ApprovalStatus::Approved,
            rejection_reason: None,
            crea_date: Utc::now(),
            modif_date: None,
            courts: vec![court(1)],
        }
    }

    /// One mutation per check, each breaking exactly that check.
    fn break_check(check: CompletenessCheck, venue: &mut Venue) {
        match check {
            CompletenessCheck::HasName => venue.name = "  A  ".to_string(),
            CompletenessCheck::HasAddress => venue.address = Some("Short st".to_string()),
            CompletenessCheck::HasDescription => venue.description = None,
            CompletenessCheck::HasPhotos => venue.photo_urls.clear(),
            CompletenessCheck::HasSports => venue.sports.clear(),
            CompletenessCheck::HasAmenities => venue.amenities.clear(),
            CompletenessCheck::HasOperatingHours => venue.operating_hours = None,
            CompletenessCheck::HasOpenDay => {
                venue.operating_hours = Some(OperatingHours {
                    tuesday: DayHours { is_open: true, open_time: Some("08:00".into()), close_time: None },
                    wednesday: DayHours { is_open: false, ..DayHours::open("08:00", "20:00") },
                    ..Default::default()
                })
            }
            CompletenessCheck::HasCourts => venue.courts.clear(),
            CompletenessCheck::HasActiveCourt => {
                let mut c = court(2);
                c.court_type = Some("   ".to_string());
                let mut inactive = court(3);
                inactive.is_active = false;
                let mut free = court(4);
                free.price_per_hour = Decimal::ZERO;
                venue.courts = vec![c, inactive, free];
            }
            CompletenessCheck::IsActive => venue.is_active = false,
            CompletenessCheck::IsApproved => venue.approval_status = ApprovalStatus::Pending,
        }
    }

    #[test]
    fn test_complete_venue_passes() {
        let venue = complete_venue(1);
        assert!(is_complete(&venue));
        let details = validation_details(&venue);
        assert!(details.is_complete);
        assert!(details.failed_checks.is_empty());
    }

    #[test]
    fn test_each_check_fails_alone() {
        for check in CompletenessCheck::ALL {
            let mut venue = complete_venue(1);
            break_check(check, &mut venue);

            assert!(!is_complete(&venue), "{:?} should make the venue incomplete", check);
            assert!(!check.passes(&venue));

            // Removing hours or courts entirely also fails the check that looks inside them
            let expected: Vec<CompletenessCheck> = match check {
                CompletenessCheck::HasOperatingHours => {
                    vec![CompletenessCheck::HasOperatingHours, CompletenessCheck::HasOpenDay]
                }
                CompletenessCheck::HasCourts => {
                    vec![CompletenessCheck::HasCourts, CompletenessCheck::HasActiveCourt]
                }
                _ => vec![check],
            };
            let details = validation_details(&venue);
            assert_eq!(details.failed_checks, expected, "{:?}", check);
            assert!(!details.is_complete);
        }
    }

    #[test]
    fn test_details_do_not_short_circuit() {
        let mut venue = complete_venue(1);
        venue.name = String::new();
        venue.photo_urls.clear();
        venue.approval_status = ApprovalStatus::Rejected;

        let details = validation_details(&venue);
        assert!(!details.has_name);
        assert!(details.has_address);
        assert!(details.has_description);
        assert!(!details.has_photos);
        assert!(details.has_sports);
        assert!(details.has_amenities);
        assert!(details.has_operating_hours);
        assert!(details.has_open_day);
        assert!(details.has_courts);
        assert!(details.has_active_court);
        assert!(details.is_active);
        assert!(!details.is_approved);
        assert_eq!(
            details.failed_checks,
            vec![CompletenessCheck::HasName, CompletenessCheck::HasPhotos, CompletenessCheck::IsApproved]
        );
    }

    #[test]
    fn test_missing_photos_reports_only_photos() {
        let mut venue = complete_venue(1);
        venue.photo_urls.clear();
        let details = validation_details(&venue);
        assert!(!is_complete(&venue));
        assert!(!details.has_photos);
        assert_eq!(details.failed_checks, vec![CompletenessCheck::HasPhotos]);
    }

    #[test]
    fn test_length_thresholds_use_trimmed_chars() {
        let mut venue = complete_venue(1);
        venue.name = " Ab ".to_string();
        venue.address = Some("  0123456789  ".to_string());
        venue.description = Some("ééééééééé".to_string());
        let details = validation_details(&venue);
        assert!(details.has_name);
        assert!(details.has_address);
        // 9 characters even though 18 bytes
        assert!(!details.has_description);
    }

    #[test]
    fn test_filter_complete_preserves_order() {
        let mut broken = complete_venue(2);
        broken.is_active = false;
        let venues = vec![complete_venue(1), broken, complete_venue(3)];

        let ids: Vec<i32> = filter_complete(venues).iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(filter_complete(Vec::new()).is_empty());
    }
}
