use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// The fixed reporting buckets. Records may carry any category string, but
/// only these five land in a named bucket; everything else counts toward the
/// grand total only.
pub const BUDGET_CATEGORIES: &[&str] = &["transport", "stay", "activities", "meals", "parking"];

/// One tracked expense against a trip.
#[derive(Debug, Clone, Serialize)]
pub struct BudgetRecord {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub category: String,
    pub amount_cents: i64,
    pub date: DateTime<Utc>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Per-bucket totals in cents. `total_cost_cents` covers every record,
/// recognized category or not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BudgetTotals {
    pub transport_cents: i64,
    pub stay_cents: i64,
    pub activities_cents: i64,
    pub meals_cents: i64,
    pub parking_cents: i64,
    pub total_cost_cents: i64,
}

impl BudgetTotals {
    fn add(&mut self, category: &str, amount_cents: i64) {
        match category {
            "transport" => self.transport_cents += amount_cents,
            "stay" => self.stay_cents += amount_cents,
            "activities" => self.activities_cents += amount_cents,
            "meals" => self.meals_cents += amount_cents,
            "parking" => self.parking_cents += amount_cents,
            _ => {}
        }
        self.total_cost_cents += amount_cents;
    }
}

/// Sum manual budget records into the fixed buckets. Integer addition over
/// cents, so the result is independent of record order.
pub fn summarize(records: &[BudgetRecord]) -> BudgetTotals {
    let mut totals = BudgetTotals::default();
    for record in records {
        totals.add(&record.category, record.amount_cents);
    }
    totals
}

/// Full breakdown: manual records plus confirmed parking-booking costs folded
/// into the parking bucket. Unlike [`summarize`], the total here is the sum
/// of the five buckets, so unrecognized categories contribute nothing.
/// Activity costs are intentionally not included; manual records and parking
/// bookings are the two budget sources.
pub fn breakdown(records: &[BudgetRecord], parking_booking_cents: &[i64]) -> BudgetTotals {
    let mut totals = BudgetTotals::default();
    for record in records {
        if BUDGET_CATEGORIES.contains(&record.category.as_str()) {
            totals.add(&record.category, record.amount_cents);
        }
    }
    for cents in parking_booking_cents {
        totals.add("parking", *cents);
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(category: &str, amount_cents: i64) -> BudgetRecord {
        BudgetRecord {
            id: Uuid::new_v4(),
            trip_id: Uuid::new_v4(),
            category: category.to_string(),
            amount_cents,
            date: Utc::now(),
            notes: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_summary_buckets() {
        let records = vec![record("transport", 40000), record("meals", 15000)];
        let totals = summarize(&records);
        assert_eq!(totals.transport_cents, 40000);
        assert_eq!(totals.meals_cents, 15000);
        assert_eq!(totals.stay_cents, 0);
        assert_eq!(totals.total_cost_cents, 55000);
    }

    #[test]
    fn test_unrecognized_category_counts_in_total_only() {
        let records = vec![record("souvenirs", 2500), record("stay", 50000)];
        let totals = summarize(&records);
        assert_eq!(totals.stay_cents, 50000);
        assert_eq!(totals.total_cost_cents, 52500);
        // No named bucket received the unrecognized amount.
        assert_eq!(
            totals.transport_cents
                + totals.activities_cents
                + totals.meals_cents
                + totals.parking_cents,
            0
        );
    }

    #[test]
    fn test_summary_is_order_independent() {
        let mut records = vec![
            record("transport", 101),
            record("meals", 99),
            record("other", 17),
            record("parking", 1234),
        ];
        let forward = summarize(&records);
        records.reverse();
        let backward = summarize(&records);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_breakdown_folds_parking_bookings() {
        let records = vec![record("parking", 10000), record("transport", 40000)];
        let totals = breakdown(&records, &[12000, 3000]);
        assert_eq!(totals.parking_cents, 25000);
        assert_eq!(totals.total_cost_cents, 65000);
    }

    #[test]
    fn test_breakdown_total_is_bucket_sum() {
        // The summary counts every record in its total; the breakdown total
        // only covers the five buckets.
        let records = vec![record("souvenirs", 2500), record("stay", 50000)];
        assert_eq!(summarize(&records).total_cost_cents, 52500);

        let totals = breakdown(&records, &[]);
        assert_eq!(totals.stay_cents, 50000);
        assert_eq!(totals.total_cost_cents, 50000);
    }

    #[test]
    fn test_empty_inputs() {
        let totals = breakdown(&[], &[]);
        assert_eq!(totals, BudgetTotals::default());
    }
}
