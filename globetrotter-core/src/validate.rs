//! Caller-supplied constraints not enforced by storage: date ordering,
//! non-negative money, sane activity durations.

use chrono::NaiveDate;

use crate::{CoreError, CoreResult};

pub const MAX_BUDGET_CENTS: i64 = 100_000_000; // 1,000,000.00
pub const MAX_ACTIVITY_HOURS: f64 = 24.0;

pub fn date_range(start: NaiveDate, end: NaiveDate) -> CoreResult<()> {
    if start > end {
        return Err(CoreError::ValidationError(
            "Start date must be before end date".to_string(),
        ));
    }
    Ok(())
}

pub fn non_negative_amount(field: &str, cents: i64) -> CoreResult<()> {
    if cents < 0 {
        return Err(CoreError::ValidationError(format!(
            "{} cannot be negative",
            field
        )));
    }
    Ok(())
}

pub fn budget_limit(cents: i64) -> CoreResult<()> {
    non_negative_amount("Budget", cents)?;
    if cents > MAX_BUDGET_CENTS {
        return Err(CoreError::ValidationError(
            "Budget exceeds maximum limit".to_string(),
        ));
    }
    Ok(())
}

pub fn activity_duration(hours: f64) -> CoreResult<()> {
    if hours <= 0.0 {
        return Err(CoreError::ValidationError(
            "Duration must be positive".to_string(),
        ));
    }
    if hours > MAX_ACTIVITY_HOURS {
        return Err(CoreError::ValidationError(
            "Activity cannot exceed 24 hours".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_date_range() {
        assert!(date_range(d(2024, 6, 1), d(2024, 6, 5)).is_ok());
        assert!(date_range(d(2024, 6, 5), d(2024, 6, 5)).is_ok());
        assert!(date_range(d(2024, 6, 6), d(2024, 6, 5)).is_err());
    }

    #[test]
    fn test_amounts() {
        assert!(non_negative_amount("Cost", 0).is_ok());
        assert!(non_negative_amount("Cost", -1).is_err());
        assert!(budget_limit(MAX_BUDGET_CENTS).is_ok());
        assert!(budget_limit(MAX_BUDGET_CENTS + 1).is_err());
    }

    #[test]
    fn test_duration() {
        assert!(activity_duration(2.0).is_ok());
        assert!(activity_duration(24.0).is_ok());
        assert!(activity_duration(0.0).is_err());
        assert!(activity_duration(24.5).is_err());
    }
}
