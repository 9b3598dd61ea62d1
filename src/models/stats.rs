//! Platform-wide counters for the admin dashboard

use std::collections::BTreeMap;

use serde::Serialize;
use utoipa::ToSchema;

/// Count per key plus the overall total
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct Breakdown {
    pub total: i64,
    pub by_key: BTreeMap<String, i64>,
}

impl Breakdown {
    /// Build from `(key, count)` rows; keys listed in `all` appear with 0 when absent
    pub fn from_counts<K: ToString>(all: &[K], rows: Vec<(K, i64)>) -> Self {
        let mut by_key: BTreeMap<String, i64> = all.iter().map(|k| (k.to_string(), 0)).collect();
        for (key, count) in rows {
            *by_key.entry(key.to_string()).or_insert(0) += count;
        }
        Self {
            total: by_key.values().sum(),
            by_key,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AdminStats {
    pub users: Breakdown,
    pub venues: Breakdown,
    pub bookings: Breakdown,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::BookingStatus;

    #[test]
    fn test_breakdown_fills_missing_keys() {
        let b = Breakdown::from_counts(
            BookingStatus::ALL,
            vec![(BookingStatus::Confirmed, 3), (BookingStatus::Cancelled, 1)],
        );
        assert_eq!(b.total, 4);
        assert_eq!(b.by_key.get("CONFIRMED"), Some(&3));
        assert_eq!(b.by_key.get("PENDING"), Some(&0));
        assert_eq!(b.by_key.len(), BookingStatus::ALL.len());
    }
}
