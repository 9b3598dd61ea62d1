//! Aggregates shown on venue listings

use rust_decimal::Decimal;

use crate::models::venue::{Court, PriceRange};

/// Hourly price span over active courts with a positive price
pub fn price_range(courts: &[Court]) -> Option<PriceRange> {
    courts
        .iter()
        .filter(|c| c.is_active && c.price_per_hour > Decimal::ZERO)
        .map(|c| c.price_per_hour)
        .fold(None, |range: Option<PriceRange>, price| {
            Some(match range {
                None => PriceRange { min: price, max: price },
                Some(r) => PriceRange {
                    min: r.min.min(price),
                    max: r.max.max(price),
                },
            })
        })
}

/// Round an average rating to one decimal place
pub fn round_rating(average: Option<f64>) -> Option<f64> {
    average.map(|avg| (avg * 10.0).round() / 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn court(price: i64, is_active: bool) -> Court {
        Court {
            id: 1,
            venue_id: 1,
            name: "Court".to_string(),
            court_type: Some("tennis".to_string()),
            price_per_hour: Decimal::new(price, 0),
            is_active,
            crea_date: Utc::now(),
            modif_date: None,
        }
    }

    #[test]
    fn test_price_range_ignores_inactive_and_free_courts() {
        let courts = vec![court(30, true), court(5, false), court(0, true), court(45, true)];
        assert_eq!(
            price_range(&courts),
            Some(PriceRange { min: Decimal::new(30, 0), max: Decimal::new(45, 0) })
        );
    }

    #[test]
    fn test_price_range_empty() {
        assert_eq!(price_range(&[]), None);
        assert_eq!(price_range(&[court(20, false)]), None);
    }

    #[test]
    fn test_round_rating() {
        assert_eq!(round_rating(Some(4.26)), Some(4.3));
        assert_eq!(round_rating(Some(3.0)), Some(3.0));
        assert_eq!(round_rating(None), None);
    }
}
