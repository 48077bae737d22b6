//! Monetary amounts are stored as integer cents so that summation is exact.
//! The JSON boundary speaks decimal major units (dollars); conversion rounds
//! half-away-from-zero to two places.

/// Convert a decimal major-unit amount (e.g. `400.0`) into integer cents.
pub fn to_cents(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

/// Convert integer cents back into a decimal major-unit amount.
pub fn to_major(cents: i64) -> f64 {
    cents as f64 / 100.0
}

pub fn opt_to_cents(amount: Option<f64>) -> Option<i64> {
    amount.map(to_cents)
}

pub fn opt_to_major(cents: Option<i64>) -> Option<f64> {
    cents.map(to_major)
}

/// Round a decimal amount to two places. Used for derived averages that are
/// never stored, only reported.
pub fn round2(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cents_round_trip() {
        assert_eq!(to_cents(400.0), 40000);
        assert_eq!(to_cents(0.01), 1);
        assert_eq!(to_major(40000), 400.0);
        assert_eq!(to_major(1), 0.01);
    }

    #[test]
    fn test_float_drift_absorbed() {
        // 0.1 + 0.2 style inputs must land on exact cents.
        assert_eq!(to_cents(0.1) + to_cents(0.2), 30);
        assert_eq!(to_cents(19.99), 1999);
        assert_eq!(to_cents(1234.565), 123457);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(7.456), 7.46);
        assert_eq!(round2(0.0), 0.0);
        assert_eq!(round2(3.5), 3.5);
    }
}
